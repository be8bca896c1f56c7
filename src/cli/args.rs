use clap::Parser;

use crate::request::Model;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The message to send
    #[arg()]
    pub message: String,

    /// Model backend to route the request to (claude or openai)
    #[arg(short, long, value_enum)]
    pub model: Option<Model>,

    /// System prompt override
    #[arg(short, long)]
    pub system_prompt: Option<String>,

    /// Fail on transport read errors instead of treating them as end-of-stream
    #[arg(long, default_value = "false")]
    pub strict: bool,
}
