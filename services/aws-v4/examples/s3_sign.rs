use anyhow::Result;
use authsign_aws_v4::{RequestSigner, StaticIdentityProvider};
use authsign_core::{ChecksumAlgorithm, ChecksumDirective, ChecksumHasher, ChecksumPlacement};
use authsign_core::{Signer, SigningPayload};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let signer = Signer::new(
        StaticIdentityProvider::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        RequestSigner::new("s3", "us-east-1"),
    );

    let chunks: [&[u8]; 3] = [b"hello ", b"streaming ", b"world"];
    let content_length = chunks.iter().map(|c| c.len() as u64).sum();

    let (mut parts, _) = http::Request::put("https://examplebucket.s3.amazonaws.com/hello.txt")
        .body(())?
        .into_parts();

    // The checksum is only known after the body is streamed, announce it as
    // a trailer.
    let directive = ChecksumDirective::new(ChecksumAlgorithm::Crc32c, ChecksumPlacement::Trailer);
    signer
        .sign(
            &mut parts,
            SigningPayload::Streaming {
                content_length: Some(content_length),
            },
            Some(&directive),
        )
        .await?;

    println!("{} {}", parts.method, parts.uri);
    for (name, value) in parts.headers.iter() {
        println!("{name}: {}", value.to_str()?);
    }

    let mut hasher = ChecksumHasher::new(directive.algorithm);
    for chunk in chunks {
        hasher.update(chunk);
    }
    println!("trailer: {}", directive.trailer_line(&hasher.finalize()));
    Ok(())
}
