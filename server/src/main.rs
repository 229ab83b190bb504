use clap::Parser;

#[derive(Debug, clap::Parser)]
struct Serve {
    /// The port number on which the server will listen for incoming connections.
    /// Example: `8080`
    #[arg(long, env("PORT"))]
    #[cfg_attr(debug_assertions, arg(default_value_t = 0))]
    port: u16,

    /// The sqlite database path used by the server.
    /// Example: `/var/lib/parity/data.db` (or) `./data.db`
    #[arg(long, env("DATABASE_URL"))]
    database_url: String,

    /// Country code to assume when the edge did not set `x-country-code`.
    /// Meant for local development only; leave unset in production.
    #[arg(long, env("TEST_COUNTRY_CODE"))]
    test_country_code: Option<String>,
}

#[tokio::main]
async fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt};

        fmt()
            .with_env_filter(EnvFilter::from_default_env(/* RUST_LOG env var sets logging level */))
            .init()
    };

    let args = Serve::parse();

    let port = args.port;
    let opts = parity::ServerOpts {
        database: parity::DatabaseConfig {
            url: args.database_url,
        },
        test_country_code: args.test_country_code,
    };

    let router = parity::router(opts).await.unwrap_or_else(|e| exit(e));
    parity::serve(router, port).await.unwrap_or_else(|e| exit(e));
}

#[inline(always)]
fn exit(err: impl std::error::Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1)
}
