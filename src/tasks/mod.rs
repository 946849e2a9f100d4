//! Background scheduled tasks for the application.
//!
//! The only recurring job is the discount-instrument reaper. Call
//! `spawn_all` once during startup to launch it; spawning once is what
//! keeps runs from overlapping.

use crate::services::DiscountService;

/// Spawn all background tasks.
///
/// Notes
/// - The reaper's deletes are idempotent, so a crash between runs loses nothing.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(discount_service: DiscountService, reaper_interval_secs: u64) {
    // Hard-delete inactive and expired discount instruments on a fixed
    // interval, independent of request traffic.
    {
        let service = discount_service.clone();
        tokio::spawn(async move {
            loop {
                match service.purge_expired().await {
                    Ok(n) if n > 0 => log::info!("Discount instruments purged: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to purge discount instruments: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(reaper_interval_secs)).await;
            }
        });
    }
}
