//! Refresh token cookie transport.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::state::AuthConfig;

pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Build the `HttpOnly`, cross-site refresh cookie set at login.
#[must_use]
pub fn refresh_cookie(config: &AuthConfig, refresh_token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, refresh_token))
        .path("/")
        .http_only(true)
        .secure(config.refresh_cookie_secure())
        .same_site(SameSite::None)
        .max_age(time::Duration::seconds(
            config.refresh_cookie_max_age_seconds(),
        ))
        .build()
}

/// Read the refresh token from the request cookies; empty values count as missing.
#[must_use]
pub fn read_refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE_NAME)
        .map(|cookie| cookie.value().trim())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
    use secrecy::SecretString;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("secret".to_string()))
    }

    #[test]
    fn cookie_attributes() {
        let cookie = refresh_cookie(&config(), "token".to_string());
        let rendered = cookie.to_string();

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "token");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.secure(), Some(false));
        assert!(rendered.contains("Max-Age=31536000"));
    }

    #[test]
    fn cookie_secure_in_production() {
        let cookie = refresh_cookie(&config().with_production(true), "token".to_string());
        assert_eq!(cookie.secure(), Some(true));
        assert!(cookie.to_string().contains("Secure"));
    }

    #[test]
    fn read_from_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; refreshToken=abc.def.ghi"),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(read_refresh_token(&jar), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn missing_or_empty_cookie() {
        let jar = CookieJar::from_headers(&HeaderMap::new());
        assert_eq!(read_refresh_token(&jar), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("refreshToken="));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(read_refresh_token(&jar), None);
    }
}
