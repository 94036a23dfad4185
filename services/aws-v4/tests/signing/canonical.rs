use super::*;
use authsign_aws_v4::{CanonicalRequest, Config, PercentEncodingMode};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_canonical_request_and_string_to_sign() -> Result<()> {
    let signer = init_signing_test();
    let Identity::Keyed(cred) = keyed("akid", "skid") else {
        unreachable!()
    };

    let (_, output) = signer.calculate(&demo_request()?, &cred, None, signing_time())?;

    assert_eq!(
        output.canonical_request,
        [
            "POST",
            "/",
            "",
            "host:demo.us-east-1.amazonaws.com",
            "x-amz-archive-description:test test",
            "x-amz-date:19810216T063000Z",
            "",
            "host;x-amz-archive-description;x-amz-date",
            "a15c8292b1d12abbbbe4148605f7872fbdf645618fee5ab0e8072a7b34f155e2",
        ]
        .join("\n")
    );
    assert_eq!(output.scope, "19810216/us-east-1/demo/aws4_request");
    assert_eq!(
        output.string_to_sign.lines().take(3).collect::<Vec<_>>(),
        vec![
            "AWS4-HMAC-SHA256",
            "19810216T063000Z",
            "19810216/us-east-1/demo/aws4_request"
        ]
    );
    Ok(())
}

#[test_case(PercentEncodingMode::Double, false, "/my%2520photo/./a.jpg"; "double")]
#[test_case(PercentEncodingMode::Double, true, "/my%2520photo/a.jpg"; "double normalized")]
#[test_case(PercentEncodingMode::Single, false, "/my%20photo/./a.jpg"; "single")]
#[test_case(PercentEncodingMode::Single, true, "/my%20photo/a.jpg"; "single normalized")]
fn test_canonical_path(mode: PercentEncodingMode, normalize: bool, expected: &str) -> Result<()> {
    let req = SigningRequest::new(Method::GET, "https://example.com/my%20photo/./a.jpg")?;
    let config = Config::new("demo", "us-east-1")
        .with_percent_encoding(mode)
        .with_normalize_path(normalize);

    let creq = CanonicalRequest::build(&req, &config, "UNSIGNED-PAYLOAD")?;
    assert_eq!(creq.path, expected);
    Ok(())
}

#[test]
fn test_canonical_query_is_sorted_and_encoded() -> Result<()> {
    let req = SigningRequest::new(
        Method::GET,
        "https://example.com/?prefix=a%20b&list-type=2&acl&delimiter=%2F&=dropped",
    )?;
    let config = Config::new("demo", "us-east-1");

    let creq = CanonicalRequest::build(&req, &config, "UNSIGNED-PAYLOAD")?;
    assert_eq!(
        creq.query,
        "acl=&delimiter=%2F&list-type=2&prefix=a%20b"
    );
    Ok(())
}

#[test]
fn test_excluded_headers_are_configurable() -> Result<()> {
    let mut req = demo_request()?;
    req.header_insert("user-agent", "authsign")?;
    req.header_insert("x-amz-meta-skip", "1")?;

    let config = Config::new("demo", "us-east-1");
    let creq = CanonicalRequest::build(&req, &config, "UNSIGNED-PAYLOAD")?;
    assert_eq!(
        creq.signed_headers(),
        "host;x-amz-archive-description;x-amz-meta-skip"
    );

    let config = config.with_excluded_header("X-Amz-Meta-Skip");
    let creq = CanonicalRequest::build(&req, &config, "UNSIGNED-PAYLOAD")?;
    assert_eq!(creq.signed_headers(), "host;x-amz-archive-description");

    let config = config.with_excluded_headers(Vec::<&str>::new());
    let creq = CanonicalRequest::build(&req, &config, "UNSIGNED-PAYLOAD")?;
    assert_eq!(
        creq.signed_headers(),
        "host;user-agent;x-amz-archive-description;x-amz-meta-skip"
    );
    Ok(())
}
