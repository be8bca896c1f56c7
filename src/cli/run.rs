use log::debug;

use super::args::Args;
use crate::{
    client::ChatClient,
    core::{Config, StreamingError},
    request::StreamRequest,
    stream::ReadErrorPolicy,
};
use futures::StreamExt;
use std::io::{self, Write};

const TOKEN_VAR: &str = "CHAT_API_TOKEN";

fn resolve_token() -> Result<String, StreamingError> {
    dotenv::var(TOKEN_VAR)
        .or_else(|_| std::env::var(TOKEN_VAR))
        .map_err(|_| {
            StreamingError::Config(format!("{TOKEN_VAR} not set in .env or environment"))
        })
}

pub async fn run(args: Args) -> Result<(), StreamingError> {
    let _ = dotenv::dotenv();

    let config = Config::load()?;
    let token = resolve_token()?;

    let mut request = StreamRequest::new(args.message);
    request.model = args.model.or(config.model);
    request.system_prompt = args.system_prompt.or(config.system_prompt);

    let policy = if args.strict {
        ReadErrorPolicy::Surface
    } else {
        ReadErrorPolicy::EndOfStream
    };

    debug!(
        "[SETTINGS] endpoint: {}, model: {:?}, read_error_policy: {policy:?}",
        config.endpoint, request.model
    );

    let client = ChatClient::new(config.endpoint, token).with_read_error_policy(policy);
    let mut stream = client.stream_chat(&request).await?;

    let mut stdout = io::stdout();
    while let Some(fragment) = stream.next().await {
        stdout.write_all(fragment?.as_bytes())?;
        stdout.flush()?;
    }

    // Ensure final newline
    writeln!(&mut stdout)?;
    Ok(())
}
