use anyhow::Result;
use authsign_aws_v4::{Config, EnvIdentityProvider, RequestSigner};
use authsign_core::{OsEnv, Signer, SigningPayload};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Region falls back to AWS_REGION or AWS_DEFAULT_REGION.
    let mut config = Config::new("dynamodb", "").from_env(&OsEnv);
    if config.region.is_empty() {
        config = config.with_region("us-east-1");
    }
    let region = config.region.clone();

    // Identity comes from AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY,
    // requests are left unsigned when they are missing.
    let signer = Signer::new(EnvIdentityProvider::new(), RequestSigner::from_config(config));

    let body = r#"{"TableName": "foo"}"#;
    let (mut parts, body) = http::Request::post(format!("https://dynamodb.{region}.amazonaws.com/"))
        .header("content-type", "application/x-amz-json-1.0")
        .header("x-amz-target", "DynamoDB_20120810.DescribeTable")
        .body(body)?
        .into_parts();

    signer
        .sign(&mut parts, SigningPayload::from(body), None)
        .await?;

    println!("{} {}", parts.method, parts.uri);
    for (name, value) in parts.headers.iter() {
        if value.is_sensitive() {
            println!("{name}: <redacted>");
        } else {
            println!("{name}: {}", value.to_str()?);
        }
    }
    Ok(())
}
