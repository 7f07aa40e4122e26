use std::sync::{atomic::AtomicBool, Arc};

pub mod aggregate;
pub mod params;
pub mod plot;
pub mod results;
pub mod simulator;

pub fn dump_file(name: &str, ext: &str) -> String {
    format!("{}_{}.{}", name, chrono::Local::now().to_rfc3339(), ext)
}

/// Flag that gets set once SIGINT arrives
pub fn interrupt_flag() -> anyhow::Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;
    Ok(stop)
}
