use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL of a running survey server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Number of surveys to submit
    #[arg(long, default_value_t = 20)]
    count: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tester::seed_surveys(&args.url, args.count).await
}
