//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `kindl_core` linkage.
//! - Run one in-memory behavior session so ranking can be eyeballed.

use kindl_core::{
    default_intents, init_logging_from_config, logging_status, BehaviorSession, CoreConfig,
    MemoryBehaviorStore, ReactionKind, SystemClock,
};

fn main() {
    println!("kindl_core ping={}", kindl_core::ping());
    println!("kindl_core version={}", kindl_core::core_version());

    let config = CoreConfig::from_env();
    match init_logging_from_config(&config) {
        Ok(()) => {
            if let Some((level, dir)) = logging_status() {
                println!("logging level={} dir={}", level, dir.display());
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let intents = default_intents();
    let mut session = BehaviorSession::new(MemoryBehaviorStore::new(), SystemClock, &config);
    session.track_view("6");
    session.track_time_spent("6", 18_000);
    session.track_reaction("6", ReactionKind::FeelsRight);
    session.track_view("3");

    let feed = session.feed(&intents, &["deep", "cozy", "social"], 10);
    for intent in &feed.ordered {
        println!(
            "intent id={} score={:.2} title={}",
            intent.id,
            session.tracker().score(&intent.id),
            intent.title
        );
    }
    println!("recently_viewed={:?}", ids(&feed.recently_viewed));
    println!("recommended={:?}", ids(&feed.recommended));
    println!("blended={:?}", ids(&feed.blended));
    println!("copy=\"{}\" background={}", feed.header_copy, feed.background);
}

fn ids(intents: &[kindl_core::Intent]) -> Vec<&str> {
    intents.iter().map(|intent| intent.id.as_str()).collect()
}
