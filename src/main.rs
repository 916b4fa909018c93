use std::env;
use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use arcmeter::{Gauge, GaugeConfig};
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    let mut min = 0.0;
    let mut max = 100.0;
    let mut title = "Gauge".to_string();
    let mut desc = String::new();
    let mut duration_ms: u64 = 1000;
    let mut animate = true;
    let mut continuous = true;
    let mut demo = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--range" => {
                if let (Some(x), Some(y)) = (args.next(), args.next()) {
                    if let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) {
                        min = x.min(y);
                        max = x.max(y);
                    }
                }
            }
            "--title" => {
                if let Some(t) = args.next() {
                    title = t;
                }
            }
            "--desc" => {
                if let Some(d) = args.next() {
                    desc = d;
                }
            }
            "--duration" => {
                if let Some(ms) = args.next() {
                    if let Ok(ms) = ms.parse() {
                        duration_ms = ms;
                    }
                }
            }
            "--no-animate" => animate = false,
            "--flat" => continuous = false,
            "--demo" => demo = true,
            other => tracing::warn!(argument = other, "ignoring unknown argument"),
        }
    }

    let config = GaugeConfig::builder()
        .min(min)
        .max(max)
        .title(title)
        .desc(desc)
        .animate(animate)
        .continuous_color(continuous)
        .anim_duration(Duration::from_millis(duration_ms))
        .build();
    let gauge = Gauge::new(config)?;
    let updater = gauge.updater();

    if demo {
        let feeder = updater.clone();
        thread::spawn(move || {
            let mut rng = rand::rng();
            loop {
                let value = rng.random_range(min..=max);
                if feeder.update(value).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(1500));
            }
        });
    }

    // Pipe values in: one number per line on stdin.
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim().parse::<f64>() {
                Ok(value) => {
                    if updater.update(value).is_err() {
                        break;
                    }
                }
                Err(_) => tracing::warn!(line = line.trim(), "ignoring unparseable input"),
            }
        }
    });

    gauge.show()?;
    Ok(())
}
