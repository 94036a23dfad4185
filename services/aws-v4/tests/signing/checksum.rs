use super::*;
use authsign_core::{ChecksumAlgorithm, ChecksumHasher, ChecksumPlacement, ErrorKind};
use pretty_assertions::assert_eq;

fn crc_directive(placement: ChecksumPlacement) -> ChecksumDirective {
    ChecksumDirective::new(ChecksumAlgorithm::Crc32, placement).with_header_name("x-amzn-header-crc")
}

#[test]
fn test_header_checksum() -> Result<()> {
    let signer = init_signing_test();
    let req = demo_request()?;

    let signed = sign(
        &signer,
        &req,
        &keyed("access", "secret"),
        Some(&crc_directive(ChecksumPlacement::Header)),
    )?;

    assert_eq!(signed.header_get("x-amzn-header-crc")?, Some("oL+a/g=="));
    assert!(signed.header_get("x-amz-content-sha256")?.is_none());
    assert_eq!(
        authorization(&signed)?,
        expected_authorization(
            "access",
            "host;x-amz-archive-description;x-amz-date;x-amzn-header-crc",
            "c1804802dc623d1689e7d0a7f9f5caee3588cc8d3df4495425129dbd52965d1f"
        )
    );
    Ok(())
}

#[test]
fn test_header_checksum_with_required_content_sha256() -> Result<()> {
    let signer = init_signing_test();
    let mut req = demo_request()?;
    req.header_insert("x-amz-content-sha256", "required")?;

    let signed = sign(
        &signer,
        &req,
        &keyed("access", "secret"),
        Some(&crc_directive(ChecksumPlacement::Header)),
    )?;

    assert_eq!(
        signed.header_get("x-amz-content-sha256")?,
        Some("a15c8292b1d12abbbbe4148605f7872fbdf645618fee5ab0e8072a7b34f155e2")
    );
    assert_eq!(
        authorization(&signed)?,
        expected_authorization(
            "access",
            "host;x-amz-archive-description;x-amz-content-sha256;x-amz-date;x-amzn-header-crc",
            "bc931232666f226854cdd9c9962dc03d791cf4024f5ca032fab996c1d15e4a5d"
        )
    );
    Ok(())
}

#[test]
fn test_header_checksum_keeps_precalculated_value() -> Result<()> {
    let signer = init_signing_test();
    let mut req = demo_request()?;
    req.header_insert("x-amzn-header-crc", "preCalculatedChecksum")?;

    let signed = sign(
        &signer,
        &req,
        &keyed("access", "secret"),
        Some(&crc_directive(ChecksumPlacement::Header)),
    )?;

    assert_eq!(
        signed.header_get("x-amzn-header-crc")?,
        Some("preCalculatedChecksum")
    );
    assert_eq!(
        authorization(&signed)?,
        expected_authorization(
            "access",
            "host;x-amz-archive-description;x-amz-date;x-amzn-header-crc",
            "f6fad563460f2ac50fe2ab5f5f5d77a787e357897ac6e9bb116ff12d30f45589"
        )
    );
    Ok(())
}

#[test]
fn test_trailer_checksum() -> Result<()> {
    let signer = init_signing_test();
    let mut req = demo_request()?;
    req.header_insert("x-amz-trailer", "x-amzn-header-crc")?;

    let signed = sign(
        &signer,
        &req,
        &keyed("access", "secret"),
        Some(&crc_directive(ChecksumPlacement::Trailer)),
    )?;

    assert!(signed.header_get("x-amzn-header-crc")?.is_none());
    assert!(signed.header_get("x-amz-content-sha256")?.is_none());
    let trailers: Vec<_> = signed.headers.get_all("x-amz-trailer").iter().collect();
    assert_eq!(trailers, vec!["x-amzn-header-crc"]);
    assert_eq!(
        authorization(&signed)?,
        expected_authorization(
            "access",
            "host;x-amz-archive-description;x-amz-date;x-amz-trailer",
            "3436c4bc175d31e87a591802e64756cebf2d1c6c2054d26ca3dc91bdd3de303e"
        )
    );
    Ok(())
}

#[test]
fn test_trailer_checksum_with_streaming_payload() -> Result<()> {
    let signer = RequestSigner::new("s3", "us-east-1").with_time(signing_time());
    let req = SigningRequest::new(Method::PUT, "https://bucket.s3.amazonaws.com/key")?.with_payload(
        SigningPayload::Streaming {
            content_length: Some(BODY.len() as u64),
        },
    );
    let directive = ChecksumDirective::new(ChecksumAlgorithm::Crc32c, ChecksumPlacement::Trailer);

    let signed = sign(&signer, &req, &keyed("akid", "skid"), Some(&directive))?;

    assert_eq!(
        signed.header_get("x-amz-content-sha256")?,
        Some("STREAMING-UNSIGNED-PAYLOAD-TRAILER")
    );
    assert_eq!(signed.header_get("x-amz-trailer")?, Some("x-amz-checksum-crc32c"));
    assert!(authorization(&signed)?
        .contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-trailer,"));

    // The payload collaborator computes the value while streaming.
    let mut hasher = ChecksumHasher::new(directive.algorithm);
    for chunk in BODY.as_bytes().chunks(7) {
        hasher.update(chunk);
    }
    let line = directive.trailer_line(&hasher.finalize());
    assert_eq!(
        line,
        format!(
            "x-amz-checksum-crc32c:{}",
            ChecksumAlgorithm::Crc32c.compute(BODY.as_bytes())
        )
    );
    Ok(())
}

#[test]
fn test_header_checksum_requires_in_memory_payload() -> Result<()> {
    let signer = init_signing_test();
    let req = demo_request()?.with_payload(SigningPayload::Streaming {
        content_length: None,
    });

    let err = signer
        .sign_request(
            &req,
            &keyed("access", "secret"),
            Some(&crc_directive(ChecksumPlacement::Header)),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PayloadInvalid);
    assert!(req.header_get("authorization")?.is_none());
    assert!(req.header_get("x-amzn-header-crc")?.is_none());
    Ok(())
}

#[test]
fn test_anonymous_skips_checksum() -> Result<()> {
    let signer = init_signing_test();
    let req = demo_request()?;

    let signed = sign(
        &signer,
        &req,
        &Identity::Anonymous,
        Some(&crc_directive(ChecksumPlacement::Header)),
    )?;

    assert_eq!(signed.headers, req.headers);
    Ok(())
}
