use std::{
    error::Error,
    sync::{Arc, RwLock},
};

use futures::future::{AbortHandle, Abortable, Aborted};
use tracing_subscriber::EnvFilter;
use wrapp_autowire::{composite, BuildOption, DiBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = Arc::new(RwLock::new(Settings {
        name: "demo".to_string(),
        workers: 4,
    }));

    let container = DiBuilder::new()
        .add_composite(settings.clone())
        .add_factory(Greeter::new)
        .add_factory(Job::new)
        .build()?;

    println!("{}", container.resolve::<Greeter>()?);
    println!("{}", container.build::<Greeter>()?.greet());

    // Jobs carry their own abort handle, so they are never cached
    let (handle, registration) = AbortHandle::new_pair();
    let job = container.build_with_context::<Job, _>(handle, [BuildOption::NonShared])?;
    job.cancel.abort();

    let result = futures::executor::block_on(Abortable::new(job.run(), registration));
    match result {
        Ok(message) => println!("{message}"),
        Err(Aborted) => println!("job was aborted"),
    }

    settings.write().map_err(|e| e.to_string())?.workers = 8;
    let greeter = container.build_with::<Greeter>([BuildOption::NonShared])?;
    println!("{}", greeter.greet());

    println!("{container:?}");
    Ok(())
}

struct Settings {
    name: String,
    workers: usize,
}
composite!(Settings { name, workers });

struct Greeter {
    name: Arc<String>,
    workers: Arc<usize>,
}
impl Greeter {
    fn new(name: Arc<String>, workers: Arc<usize>) -> Self {
        Self { name, workers }
    }

    fn greet(&self) -> String {
        format!("Hello from {} with {} workers", self.name, self.workers)
    }
}

struct Job {
    greeter: Arc<Greeter>,
    cancel: Arc<AbortHandle>,
}
impl Job {
    fn new(greeter: Arc<Greeter>, cancel: Arc<AbortHandle>) -> Self {
        Self { greeter, cancel }
    }

    async fn run(&self) -> String {
        self.greeter.greet()
    }
}
