use clap::Parser;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";

#[derive(Parser, Clone)]
#[command(version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Cli {
    #[arg(
        long = "transport",
        value_name = "TRANSPORT",
        env = "GITLAB_MCP_TRANSPORT",
        default_value = "stdio",
        value_parser = ["stdio", "sse", "streamable-http"]
    )]
    pub transport: String,

    #[arg(
        long = "bind-address",
        value_name = "ADDRESS",
        help = "Address to bind for the sse and streamable-http transports",
        env = "GITLAB_MCP_BIND_ADDRESS",
        default_value = DEFAULT_BIND_ADDRESS
    )]
    pub bind_address: String,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}
