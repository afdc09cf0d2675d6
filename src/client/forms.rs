use rand::Rng;

/// A single-file `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartUpload {
    pub boundary: String,
    pub content: String,
}

impl MultipartUpload {
    pub fn of(filename: &str, file_content: &str) -> Self {
        let boundary = format!("----{}", rand::thread_rng().gen_range(0..i64::MAX / 2));
        MultipartUpload::format(filename, file_content, &boundary)
    }

    pub fn format(filename: &str, file_content: &str, boundary: &str) -> Self {
        let content = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\
             \r\n\
             {file_content}\r\n\
             --{boundary}--"
        );

        Self {
            boundary: boundary.to_string(),
            content,
        }
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// `application/x-www-form-urlencoded` body, keeping the order of `params`.
pub fn encode_form(params: &[(&str, &str)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_frames_the_file() {
        let upload = MultipartUpload::format("activity.tcx", "<xml/>", "----1234");

        assert_eq!(
            upload.content,
            "------1234\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"activity.tcx\"\r\n\
             Content-Type: application/octet-stream\r\n\
             \r\n\
             <xml/>\r\n\
             ------1234--"
        );
        assert_eq!(
            upload.content_type(),
            "multipart/form-data; boundary=----1234"
        );
    }

    #[test]
    fn random_boundary_is_dashes_then_digits() {
        let upload = MultipartUpload::of("activity.tcx", "<xml/>");

        let digits = upload.boundary.strip_prefix("----").unwrap();
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        assert!(upload.content.ends_with(&format!("--{}--", upload.boundary)));
    }

    #[test]
    fn form_values_are_escaped() {
        assert_eq!(
            encode_form(&[("username", "rider@example.com"), ("password", "a b&c")]),
            "username=rider%40example.com&password=a%20b%26c"
        );
    }
}
