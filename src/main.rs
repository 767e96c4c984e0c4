//! Terra Voyage entry point
//!
//! On the web, sets up logging and leaves the frame loop to the JS host,
//! which drives `WebExplorer`. Natively, flies a scripted headless run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Terra Voyage starting...");
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Terra Voyage (native) starting...");

    if let Err(e) = demo_flight() {
        log::error!("Demo flight failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Fly from the start toward the Health station, enter it, and come back
#[cfg(not(target_arch = "wasm32"))]
fn demo_flight() -> Result<(), terra_voyage::SimError> {
    use terra_voyage::consts::REFERENCE_FRAME_MS;
    use terra_voyage::{Explorer, ExplorerConfig, View};

    let config = ExplorerConfig::default();
    let mut explorer = Explorer::new(config)?;
    explorer.set_on_complete(|id| log::info!("onComplete({})", id));

    let frame_ms = REFERENCE_FRAME_MS as f64;
    let mut now = 0.0;
    explorer.frame(now)?;

    // Health sits up and to the right of the start position
    explorer.key_down("d", now)?;
    explorer.key_down("w", now)?;

    let mut selected = false;
    for frame in 0..2000 {
        now += frame_ms;
        let out = explorer.frame(now)?;

        if frame % 30 == 0 {
            log::info!(
                "t={:>6.0}ms pos=({:>5.1},{:>5.1}) speed={:.2} year={} near={:?} view={:?} phase={:?} {:.0}%",
                now,
                out.nav.position.x,
                out.nav.position.y,
                out.nav.velocity.length(),
                out.year,
                out.nav.nearest_station_id,
                out.view,
                out.transition.phase_name,
                out.transition.progress_percent,
            );
        }

        if !selected && out.nav.nearest_station_id.as_deref() == Some("health") {
            explorer.key_up("d");
            explorer.key_up("w");
            let station = explorer.select(now)?;
            log::info!("Selected {}", station.name);
            selected = true;
        }

        if out.arrived.is_some() {
            explorer.back_to_space()?;
            break;
        }
    }

    if *explorer.view() != View::Space {
        log::warn!("Demo ended in {:?}", explorer.view());
    }
    Ok(())
}
