//! Tests for the HTTP parser.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::parser::{
        content_length, find_header_end, parse_query, parse_request, Error, HttpRequest, HttpVersion, Method,
    };

    #[test]
    fn test_parse_simple_get_request() {
        let request = b"GET /students HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::GET);
        assert_eq!(result.path, "/students");
        assert_eq!(result.version, HttpVersion::Http11);
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert!(result.body.is_empty());
        assert!(result.query_params.is_empty());
    }

    #[test]
    fn test_case_insensitive_headers() {
        let request = b"GET /students HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert!(result.has_header("host"));
        assert!(result.has_header("HOST"));
        assert_eq!(result.get_header("hOsT").unwrap(), "example.com");
    }

    #[test]
    fn test_missing_host_header() {
        let request = b"GET /students HTTP/1.1\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::MissingHeader(ref h)) if h == "Host"));
    }

    #[test]
    fn test_http10_without_host() {
        let request = b"GET /students HTTP/1.0\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.version, HttpVersion::Http10);
        assert!(result.headers.is_empty());
    }

    #[test]
    fn test_invalid_method() {
        let request = b"get /students HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "get"));
    }

    #[test]
    fn test_invalid_http_version() {
        let request = b"GET /students HTTP/9.9\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidVersion(ref v)) if v == "HTTP/9.9"));
    }

    #[test]
    fn test_target_must_be_absolute_path() {
        let request = b"GET students HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidPath(ref p)) if p == "students"));
    }

    #[test]
    fn test_invalid_header_format() {
        let request = b"GET /students HTTP/1.1\r\nInvalidHeader\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidHeaderFormat(ref line)) if line == "InvalidHeader"));
    }

    #[test]
    fn test_empty_request() {
        assert!(matches!(parse_request(b""), Err(Error::EmptyRequest)));
        assert!(matches!(parse_request(b"\r\n\r\n"), Err(Error::EmptyRequest)));
    }

    #[test]
    fn test_incomplete_request_line() {
        let result = parse_request(b"GET\r\n");
        assert!(matches!(result, Err(Error::MalformedRequestLine(_))));
    }

    #[test]
    fn test_all_methods() {
        for method in Method::ALL {
            let request = format!("{method} /students HTTP/1.1\r\nHost: example.com\r\n\r\n");
            let result = parse_request(request.as_bytes()).unwrap();
            assert_eq!(result.method, method);
        }
    }

    #[test]
    fn test_method_round_trips_through_display() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
        assert_eq!(Method::DELETE.to_string(), "DELETE");
    }

    #[test]
    fn test_mixed_line_endings() {
        let request = b"GET /students HTTP/1.1\r\nHost: example.com\nUser-Agent: test\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.headers.get("Host").unwrap(), "example.com");
        assert_eq!(result.headers.get("User-Agent").unwrap(), "test");
    }

    #[test]
    fn test_path_is_split_from_query() {
        let request = b"GET /students/query?id=1&firstName=Ale&lastName=Popa HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let result = parse_request(request).unwrap();
        assert_eq!(result.path, "/students/query");
        assert_eq!(result.get_query_param("id"), Some("1"));
        assert_eq!(result.get_query_param("firstName"), Some("Ale"));
        assert_eq!(result.get_query_param("lastName"), Some("Popa"));
        assert!(!result.has_query_param("missing"));
    }

    #[test]
    fn test_query_values_are_decoded() {
        let params = parse_query("q=test%20query&name=John+Doe&filter=name:john");
        assert_eq!(params["q"], vec!["test query"]);
        assert_eq!(params["name"], vec!["John Doe"]);
        assert_eq!(params["filter"], vec!["name:john"]);
    }

    #[test]
    fn test_query_keeps_repeated_values_in_order() {
        let params = parse_query("tag=a&tag=b&&flag&empty=");
        assert_eq!(params["tag"], vec!["a", "b"]);
        assert_eq!(params["flag"], vec![""]);
        assert_eq!(params["empty"], vec![""]);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_query_drops_undecodable_pairs() {
        let params = parse_query("bad=%FF&good=1");
        assert!(!params.contains_key("bad"));
        assert_eq!(params["good"], vec!["1"]);
    }

    #[test]
    fn test_malformed_utf8_in_request() {
        let request = b"GET /students HTTP/1.1\r\nHost: example.com\r\nX-Test: \xFF\xFF\r\n\r\n";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::MalformedRequestLine(ref s)) if s == "Invalid UTF-8"));
    }

    #[test]
    fn test_body_is_captured() {
        let request = b"POST /students/create HTTP/1.1\r\n\
            Host: example.com\r\n\
            Content-Type: application/json\r\n\
            Content-Length: 43\r\n\
            \r\n\
            {\"id\":5,\"firstName\":\"Ana\",\"lastName\":\"Pop\"}";

        let result = parse_request(request).unwrap();
        assert_eq!(result.method, Method::POST);
        assert_eq!(result.path, "/students/create");
        assert_eq!(result.body, br#"{"id":5,"firstName":"Ana","lastName":"Pop"}"#.to_vec());
    }

    #[test]
    fn test_body_is_truncated_to_content_length() {
        let request = b"POST /echo HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nhello world";
        let result = parse_request(request).unwrap();
        assert_eq!(result.body, b"hello".to_vec());
    }

    #[test]
    fn test_body_may_contain_invalid_utf8() {
        let request = b"POST /echo HTTP/1.1\r\nHost: example.com\r\n\r\n\xFF\xFE";
        let result = parse_request(request).unwrap();
        assert_eq!(result.body, vec![0xFF, 0xFE]);
    }

    #[test]
    fn test_invalid_content_length() {
        let request = b"POST /echo HTTP/1.1\r\nHost: example.com\r\nContent-Length: lots\r\n\r\nbody";
        let result = parse_request(request);
        assert!(matches!(result, Err(Error::InvalidContentLength(ref v)) if v == "lots"));
    }

    #[test]
    fn test_find_header_end() {
        assert_eq!(find_header_end(b"GET / HTTP/1.0\r\n\r\nbody"), Some((14, 18)));
        assert_eq!(find_header_end(b"GET / HTTP/1.0\n\nbody"), Some((14, 16)));
        assert_eq!(find_header_end(b"GET / HTTP/1.0\r\nHost: x\r\n"), None);
    }

    #[test]
    fn test_content_length_lookup() {
        let head = b"POST / HTTP/1.1\r\nhost: x\r\ncontent-length: 12";
        assert_eq!(content_length(head).unwrap(), Some(12));
        assert_eq!(content_length(b"GET / HTTP/1.1\r\nHost: x").unwrap(), None);
    }

    #[test]
    fn test_http_request_constructor() {
        let mut headers = HashMap::new();
        headers.insert("Host".to_string(), "example.com".to_string());

        let request = HttpRequest::new(Method::PUT, "/students/1/update?dry=true", HttpVersion::Http11, headers)
            .with_body(b"{}".to_vec());

        assert_eq!(request.path, "/students/1/update");
        assert_eq!(request.get_query_param("dry"), Some("true"));
        assert_eq!(request.body, b"{}".to_vec());
        assert!(request.get_header("X-Test").is_none());
    }

    #[test]
    fn test_http_version_display() {
        assert_eq!(HttpVersion::Http10.to_string(), "HTTP/1.0");
        assert_eq!(HttpVersion::Http11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::Http20.to_string(), "HTTP/2");
    }
}
