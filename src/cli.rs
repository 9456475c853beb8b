use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "a2m")]
#[command(about = "Demo client for an MCP server speaking JSON-RPC over SSE", long_about = None)]
pub struct Args {
    #[arg(
        long = "base-url",
        help = "Base URL of the MCP server (e.g., http://localhost:3000)"
    )]
    pub base_url: Option<String>,

    #[arg(short = 'v', long = "verbose", help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        long = "skip-discovery",
        help = "Skip tools/list discovery before calling tools"
    )]
    pub skip_discovery: bool,

    #[arg(
        long = "invoice",
        help = "Fetch a single invoice by id instead of running the full demo flow"
    )]
    pub invoice: Option<String>,
}
