//! Binary entry point: read the config, start logging, pick the catalog
//! backend, load the list once and hand control to the terminal loop.
use anyhow::Context;
use log::info;
use services_table::logging::{init_logging, logging_status};
use services_table::{run_app, App, Backend, CatalogClient, Config, HttpCatalog, SqliteCatalog};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_logging(&config.log_level, &config.log_dir).context("failed to start logging")?;
    if let Some((level, dir)) = logging_status() {
        info!("event=startup module=app log_level={level} log_dir={}", dir.display());
    }

    let client: Box<dyn CatalogClient> = match &config.backend {
        Backend::Http { base_url, timeout } => {
            info!("event=backend_select module=app backend=http url={base_url}");
            Box::new(HttpCatalog::new(base_url, *timeout).context("failed to build HTTP client")?)
        }
        Backend::Sqlite { path } => {
            info!("event=backend_select module=app backend=sqlite path={}", path.display());
            Box::new(SqliteCatalog::open(path)?)
        }
    };

    let mut app = App::new(client, config.rows_per_page);
    app.load();
    run_app(&mut app)
}
