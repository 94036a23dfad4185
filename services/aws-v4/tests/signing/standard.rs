use super::*;
use authsign_aws_v4::StaticIdentityProvider;
use authsign_core::{ErrorKind, Signer};
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test_case(
    "access", "secret", &[], &[],
    "host;x-amz-archive-description;x-amz-date",
    "77fe7c02927966018667f21d1dc3dfad9057e58401cbb9ed64f1b7868288e35a";
    "plain request"
)]
#[test_case(
    "access", "secret", &[("x-amz-sha256", "required")], &[],
    "host;x-amz-archive-description;x-amz-date;x-amz-sha256",
    "e73e20539446307a5dc71252dbd5b97e861f1d1267456abda3ebd8d57e519951";
    "custom header is signed literally"
)]
#[test_case(
    "access", "secret", &[], &[("Foo", None)],
    "host;x-amz-archive-description;x-amz-date",
    "c45a3ff1f028e83017f3812c06b4440f0b3240264258f6e18cd683b816990ba4";
    "query without value"
)]
#[test_case(
    "akid", "skid", &[], &[],
    "host;x-amz-archive-description;x-amz-date",
    "581d0042389009a28d461124138f1fe8eeb8daed87611d2a2b47fd3d68d81d73";
    "plain request with other keys"
)]
#[test_case(
    "akid", "skid", &[], &[("", Some("value"))],
    "host;x-amz-archive-description;x-amz-date",
    "581d0042389009a28d461124138f1fe8eeb8daed87611d2a2b47fd3d68d81d73";
    "query with empty name is dropped"
)]
#[test_case(
    "akid", "skid", &[], &[("", None)],
    "host;x-amz-archive-description;x-amz-date",
    "581d0042389009a28d461124138f1fe8eeb8daed87611d2a2b47fd3d68d81d73";
    "query with empty name and no value is dropped"
)]
#[test_case(
    "akid", "skid", &[("X-Amzn-Trace-Id", "Root=1-5759e988-bd862e3fe1be46a994272793")], &[],
    "host;x-amz-archive-description;x-amz-date",
    "581d0042389009a28d461124138f1fe8eeb8daed87611d2a2b47fd3d68d81d73";
    "trace id is not signed"
)]
#[test_case(
    "akid", "skid", &[("foo", "bar"), ("foo", "baz")], &[],
    "foo;host;x-amz-archive-description;x-amz-date",
    "1253bc1751048ea299e688cbe07a2224292e5cc606a079cb40459ad987793c19";
    "duplicate header values are joined"
)]
#[test_case(
    "akid", "skid", &[("My-header1", "    a   b   c  "), ("My-Header2", "    \"a   b   c\"  ")], &[],
    "host;my-header1;my-header2;x-amz-archive-description;x-amz-date",
    "6d3520e3397e7aba593d8ebd8361fc4405e90aed71bc4c7a09dcacb6f72460b9";
    "header values are folded"
)]
fn test_sign_demo_request(
    access_key_id: &str,
    secret_access_key: &str,
    headers: &[(&str, &str)],
    query: &[(&str, Option<&str>)],
    signed_headers: &str,
    signature: &str,
) -> Result<()> {
    let signer = init_signing_test();

    let mut req = demo_request()?;
    for (name, value) in headers {
        req.header_append(name, value)?;
    }
    for (name, value) in query {
        req.query_push(*name, *value);
    }

    let signed = sign(&signer, &req, &keyed(access_key_id, secret_access_key), None)?;

    assert_eq!(
        authorization(&signed)?,
        expected_authorization(access_key_id, signed_headers, signature)
    );
    assert_eq!(signed.header_get("x-amz-date")?, Some("19810216T063000Z"));
    Ok(())
}

#[test]
fn test_signing_is_deterministic() -> Result<()> {
    let signer = init_signing_test();
    let req = demo_request()?;
    let identity = keyed("akid", "skid");

    let Identity::Keyed(cred) = &identity else {
        unreachable!()
    };
    let (first_req, first) = signer.calculate(&req, cred, None, signing_time())?;
    let (second_req, second) = signer.calculate(&req, cred, None, signing_time())?;

    assert_eq!(first, second);
    assert_eq!(first_req.headers, second_req.headers);
    assert_eq!(
        first.signature,
        "581d0042389009a28d461124138f1fe8eeb8daed87611d2a2b47fd3d68d81d73"
    );
    Ok(())
}

#[test]
fn test_transmitted_request_keeps_order() -> Result<()> {
    let signer = init_signing_test();

    let mut req = demo_request()?;
    req.query_push("z", Some("1"));
    req.query_push("a", Some("2"));
    req.header_append("x-b", "1")?;
    req.header_append("x-a", "2")?;

    let signed = sign(&signer, &req, &keyed("akid", "skid"), None)?;

    assert_eq!(
        signed.uri()?.to_string(),
        "http://demo.us-east-1.amazonaws.com/?z=1&a=2"
    );
    assert_eq!(signed.query, req.query);
    assert_eq!(signed.header_get("x-amz-archive-description")?, Some("test  test"));
    Ok(())
}

#[test]
fn test_anonymous_request_is_untouched() -> Result<()> {
    let signer = init_signing_test();
    let req = demo_request()?;

    let signed = sign(&signer, &req, &Identity::Anonymous, None)?;

    assert!(signed.header_get("authorization")?.is_none());
    assert!(signed.header_get("x-amz-date")?.is_none());
    assert_eq!(signed.headers, req.headers);
    assert_eq!(signed.uri()?, req.uri()?);
    Ok(())
}

#[test]
fn test_config_errors_fail_before_signing() -> Result<()> {
    let req = demo_request()?;

    let signer = RequestSigner::new("demo", "").with_time(signing_time());
    let err = signer
        .sign_request(&req, &keyed("akid", "skid"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let signer = RequestSigner::new("", "us-east-1").with_time(signing_time());
    let err = signer
        .sign_request(&req, &keyed("akid", "skid"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    // Anonymous requests never need a scope.
    assert!(signer
        .sign_request(&req, &Identity::Anonymous, None)
        .is_ok());
    Ok(())
}

#[tokio::test]
async fn test_signer_signs_http_parts() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let signer = Signer::new(
        StaticIdentityProvider::new("access", "secret"),
        init_signing_test(),
    );

    let mut parts = http::Request::builder()
        .method(Method::POST)
        .uri("http://demo.us-east-1.amazonaws.com/")
        .header("Host", "demo.us-east-1.amazonaws.com")
        .header("x-amz-archive-description", "test  test")
        .body(())?
        .into_parts()
        .0;

    signer
        .sign(&mut parts, SigningPayload::from(BODY), None)
        .await?;

    assert_eq!(
        parts.headers["authorization"],
        expected_authorization(
            "access",
            "host;x-amz-archive-description;x-amz-date",
            "77fe7c02927966018667f21d1dc3dfad9057e58401cbb9ed64f1b7868288e35a"
        )
        .as_str()
    );
    assert_eq!(parts.headers["x-amz-date"], "19810216T063000Z");
    Ok(())
}

#[tokio::test]
async fn test_signer_passes_anonymous_through() -> Result<()> {
    let signer = Signer::new(StaticIdentityProvider::anonymous(), init_signing_test());

    let (mut parts, _) = http::Request::builder()
        .method(Method::GET)
        .uri("http://demo.us-east-1.amazonaws.com/?acl")
        .body(())?
        .into_parts();

    signer
        .sign(&mut parts, SigningPayload::Unsigned, None)
        .await?;

    assert!(parts.headers.is_empty());
    assert_eq!(parts.uri.to_string(), "http://demo.us-east-1.amazonaws.com/?acl");
    Ok(())
}

#[tokio::test]
async fn test_signer_keeps_transmitted_query() -> Result<()> {
    let uri = "http://demo.us-east-1.amazonaws.com/?q=a+b&x=%7e&&k=%FF";

    for provider in [
        StaticIdentityProvider::anonymous(),
        StaticIdentityProvider::new("akid", "skid"),
    ] {
        let signer = Signer::new(provider, init_signing_test());
        let (mut parts, _) = http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(())?
            .into_parts();

        signer
            .sign(&mut parts, SigningPayload::Unsigned, None)
            .await?;
        assert_eq!(parts.uri.to_string(), uri);
    }
    Ok(())
}

#[tokio::test]
async fn test_signer_rejects_expiring_credential() -> Result<()> {
    let cred = Credential::new("akid", "skid")
        .with_expires_in(authsign_core::time::now() + chrono::TimeDelta::seconds(10));
    let signer = Signer::new(
        StaticIdentityProvider::from(Identity::Keyed(cred)),
        init_signing_test(),
    );

    let (mut parts, _) = http::Request::builder()
        .method(Method::GET)
        .uri("http://demo.us-east-1.amazonaws.com/")
        .body(())?
        .into_parts();

    let err = signer
        .sign(&mut parts, SigningPayload::Unsigned, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    assert!(parts.headers.is_empty());
    Ok(())
}
