use layerfile_config::Loader;
use layerfile_lsp::{logging, LayerfileLanguageServer};
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

/// Project-level settings picked up from the server's working directory.
const CONFIG_FILE: &str = "layerfile-lsp.toml";

#[tokio::main]
async fn main() {
    let config = match Loader::new().with_optional_file(CONFIG_FILE).build() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid {}: {}", CONFIG_FILE, err);
            std::process::exit(1);
        }
    };
    logging::init(&config.logging.filter);

    let stdin = stdin();
    let stdout = stdout();
    let (service, socket) =
        LspService::new(|client| LayerfileLanguageServer::new(client, &config));
    Server::new(stdin, stdout, socket).serve(service).await;
}
