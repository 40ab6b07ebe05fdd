//! Basic example of the mkit service container and event bus.

use std::sync::Arc;

use mkit::prelude::*;

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Config {
    database_url: String,
    debug: bool,
}

struct Database {
    url: String,
    logger: Arc<dyn Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

#[derive(Debug)]
struct UserLoaded(u64);

struct UserService {
    db: Arc<Database>,
    events: Arc<EventBus>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        let result = self.db.query(&format!("SELECT * FROM users WHERE id = {id}"));
        self.events.dispatch(UserLoaded(id));
        result
    }
}

async fn load_config() -> Result<Config> {
    Ok(Config {
        database_url: "postgres://localhost/myapp".to_string(),
        debug: true,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("mkit_container=debug,mkit_events=debug")
        .init();

    // Shared pieces live in their own builder and are imported below.
    let infrastructure = Container::builder()
        .eager("logger", |_| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>))
        .eager("events", |_| Ok(EventBus::new()));

    let container = make_container(|b| {
        b.import(&infrastructure)
            .declare("database")
            .eager_async("config", |_| load_config())
            .lazy("database", |c| {
                let config = c.get::<Config>("config")?;
                let logger = c.resolve::<Arc<dyn Logger>>("logger")?;
                Ok(Database {
                    url: config.database_url.clone(),
                    logger,
                })
            })
            .lazy("users", |c| {
                Ok(UserService {
                    db: c.get("database")?,
                    events: c.get("events")?,
                })
            })
    })?
    .await?;

    println!("Container built: {container:?}");

    let config = container.get::<Config>("config")?;
    println!("Config: database_url={}, debug={}", config.database_url, config.debug);

    let events = container.get::<EventBus>("events")?;
    let _loaded = events.subscribe(|event: &UserLoaded| println!("User {} loaded", event.0));

    println!("database resolved yet? {}", container.is_resolved("database"));
    let users = container.get::<UserService>("users")?;
    println!("{}", users.get_user(42));
    println!("database resolved yet? {}", container.is_resolved("database"));

    // Misspelled keys come back with suggestions.
    if let Err(err) = container.get_value("user") {
        println!("{err}");
    }

    Ok(())
}
