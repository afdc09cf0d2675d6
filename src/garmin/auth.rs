use curl::easy::{Easy, List};

use crate::{
    client::{forms::encode_form, http::perform},
    errors::{HttpError, SyncResult},
    logln, logvbln,
};

const APP_URL: &str = "https://connect.garmin.com/modern/";
const GARMIN_SSO: &str = "https://sso.garmin.com";
const LOGIN_URL: &str = "https://sso.garmin.com/sso/signin\
    ?service=https://connect.garmin.com/modern\
    &clientId=GarminConnect\
    &gauthHost=https://sso.garmin.com/sso\
    &consumeServiceTicket=false";
const LOAD_BALANCER_DOMAIN: &str = "connect.garmin.com";
const MAX_REDIRECTS: usize = 7;

/// A cookie as kept by curl's cookie engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Cookie {
    pub domain: String,
    pub name: String,
    pub value: String,
}

impl Cookie {
    /// Parses one line of curl's Netscape cookie dump.
    pub fn parse(line: &str) -> Option<Cookie> {
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
        if line.starts_with('#') {
            return None;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 7 {
            return None;
        }

        Some(Cookie {
            domain: fields[0].trim_start_matches('.').to_string(),
            name: fields[5].to_string(),
            value: fields[6].trim_end().to_string(),
        })
    }
}

/// The three cookies that make up a live Garmin Connect session.
#[derive(Debug, Clone, PartialEq)]
pub struct GarminSession {
    pub session_id: String,
    pub sso_guid: String,
    pub load_balancer: String,
}

impl GarminSession {
    const CC: &'static str = "GarminAuth";

    /// Signs in through the embedded SSO form, then walks the app's redirects so the ticket
    /// turns into session cookies.
    pub fn login(email: &str, password: &str) -> SyncResult<Self> {
        let mut handle = Easy::new();
        // Empty file name switches the in-memory cookie engine on.
        handle.cookie_file("")?;

        let mut headers = List::new();
        headers.append(&format!("Origin: {}", GARMIN_SSO))?;
        headers.append("Content-Type: application/x-www-form-urlencoded")?;
        handle.http_headers(headers)?;
        handle.url(LOGIN_URL)?;
        handle.post(true)?;
        handle.post_fields_copy(
            encode_form(&[
                ("username", email),
                ("password", password),
                ("_eventId", "submit"),
                ("embed", "true"),
            ])
            .as_bytes(),
        )?;

        let response = perform(&mut handle)?;
        if response.status != 200 {
            return Err(HttpError::from_response(response.status, &response.body)
                .with_comment("Error while logging in")
                .into());
        }

        handle.http_headers(List::new())?;
        handle.get(true)?;

        let mut location = APP_URL.to_string();
        let mut redirects = 0;
        loop {
            handle.url(&location)?;
            let response = perform(&mut handle)?;
            if response.status == 200 {
                break;
            }

            redirects += 1;
            if redirects > MAX_REDIRECTS {
                return Err(HttpError::no_response(&format!(
                    "Failed to initialize token after {} redirects",
                    MAX_REDIRECTS
                ))
                .into());
            }

            match response.header("location") {
                Some(next) => {
                    logvbln!("Redirect {} to {}", redirects, next);
                    location = next.to_string();
                }
                None => break,
            }
        }

        let mut cookies = Vec::new();
        for line in handle.cookies()?.iter() {
            if let Some(cookie) = Cookie::parse(&String::from_utf8_lossy(line)) {
                cookies.push(cookie);
            }
        }

        let session = GarminSession::from_cookies(&cookies)?;
        logln!("Logged in to Garmin Connect after {} redirects", redirects);
        Ok(session)
    }

    pub fn from_cookies(cookies: &[Cookie]) -> SyncResult<Self> {
        let find = |name: &str, domain: Option<&str>| {
            cookies
                .iter()
                .find(|cookie| {
                    cookie.name == name && domain.map_or(true, |domain| cookie.domain == domain)
                })
                .map(|cookie| cookie.value.clone())
        };

        match (
            find("SESSIONID", None),
            find("GARMIN-SSO-GUID", None),
            find("__cflb", Some(LOAD_BALANCER_DOMAIN)),
        ) {
            (Some(session_id), Some(sso_guid), Some(load_balancer)) => Ok(Self {
                session_id,
                sso_guid,
                load_balancer,
            }),
            _ => Err(HttpError::no_response(
                "Missing required cookies from login process, login failed",
            )
            .into()),
        }
    }

    pub fn to_cookies(&self) -> String {
        format!(
            "__cflb={}; SESSIONID={}; GARMIN-SSO-GUID={}",
            self.load_balancer, self.session_id, self.sso_guid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyncError;

    fn cookie(domain: &str, name: &str, value: &str) -> Cookie {
        Cookie {
            domain: domain.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn cookie_dump_lines_are_parsed() {
        let plain = Cookie::parse("connect.garmin.com\tFALSE\t/\tTRUE\t0\t__cflb\tlb-1").unwrap();
        let http_only =
            Cookie::parse("#HttpOnly_.garmin.com\tTRUE\t/\tTRUE\t0\tSESSIONID\tabc\n").unwrap();

        assert_eq!(plain, cookie("connect.garmin.com", "__cflb", "lb-1"));
        assert_eq!(http_only, cookie("garmin.com", "SESSIONID", "abc"));
        assert!(Cookie::parse("# Netscape HTTP Cookie File").is_none());
        assert!(Cookie::parse("garmin.com\tTRUE\t/").is_none());
    }

    #[test]
    fn session_needs_load_balancer_from_connect() {
        let mut cookies = vec![
            cookie("garmin.com", "SESSIONID", "abc"),
            cookie("sso.garmin.com", "GARMIN-SSO-GUID", "guid"),
            cookie("sso.garmin.com", "__cflb", "wrong"),
        ];
        assert!(matches!(
            GarminSession::from_cookies(&cookies),
            Err(SyncError::Upstream(_))
        ));

        cookies.push(cookie("connect.garmin.com", "__cflb", "lb-1"));
        let session = GarminSession::from_cookies(&cookies).unwrap();

        assert_eq!(
            session.to_cookies(),
            "__cflb=lb-1; SESSIONID=abc; GARMIN-SSO-GUID=guid"
        );
    }
}
