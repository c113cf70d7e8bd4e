use std::sync::Arc;

use anyhow::{Context, Result};

use wxduel_battle::{
    summarize, BattleRunner, ForecastArchive, ForecastRecord, Scoreboard, Thresholds, Winner,
};
use wxduel_core::{Clock, Config, FileStore, KeyValueStore, SystemClock};
use wxduel_meteo::{MeteoClient, ModelPair};

fn fmt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:6.1}", v),
        None => "     -".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    wxduel_core::init()?;

    let config = Config::load_validated().context("loading configuration")?;
    let store: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::new(&config.config_dir).context("opening storage")?);

    let clock = SystemClock;
    let today = clock.today();
    let lat = config.location.latitude;
    let lon = config.location.longitude;

    let client = MeteoClient::new(&config.forecast)?;
    let pair = ModelPair::for_location(lat, lon);
    let archive = ForecastArchive::new(Arc::clone(&store), config.battle.retention_days);

    println!(
        "wxduel - {} ({:.2}, {:.2})",
        config.location.city, lat, lon
    );
    println!(
        "{} vs {}\n",
        pair.primary.display_name(),
        pair.secondary.display_name()
    );

    match client.fetch_forecast(lat, lon, &pair).await {
        Ok(forecast) => {
            // Persist before rendering so today's forecast is archived even
            // if output is interrupted.
            let record = ForecastRecord::from_blended(&forecast, today, lat, lon);
            archive.save(record).context("archiving forecast")?;

            println!(
                "{:<12} {:>21} {:>21}",
                "Date",
                pair.primary.display_name(),
                pair.secondary.display_name()
            );
            println!("{:<12} {:>21} {:>21}", "", "max/min/rain%", "max/min/rain%");
            for (i, date) in forecast.dates.iter().enumerate() {
                let a = &forecast.model_a;
                let b = &forecast.model_b;
                let cell = |m: &wxduel_meteo::ModelDaily| {
                    format!(
                        "{}/{}/{}",
                        fmt(m.temp_max.get(i).copied().flatten()),
                        fmt(m.temp_min.get(i).copied().flatten()),
                        fmt(m.precip_probability.get(i).copied().flatten()),
                    )
                };
                println!("{:<12} {:>21} {:>21}", date.to_string(), cell(a), cell(b));
            }
        }
        Err(e) => {
            tracing::error!("forecast fetch failed: {}", e);
            println!("Forecast unavailable: {}", e.user_message());
        }
    }

    let runner = BattleRunner::new(
        &client,
        &archive,
        &clock,
        Thresholds::new(
            config.battle.temperature_threshold_c,
            config.battle.precipitation_threshold,
        ),
    );
    let report = runner.evaluate_all().await;

    if report.battles.is_empty() {
        println!("\nNo verifiable forecasts yet. Come back tomorrow.");
    } else {
        let scoreboard = Scoreboard::new(Arc::clone(&store));
        let latest = &report.battles[0];
        let state = scoreboard.record_win(latest.overall, latest.target_date, today)?;

        println!("\nLatest battle ({}):", latest.target_date);
        let verdict = match latest.overall {
            Winner::ModelA => format!("{} wins", latest.model_a),
            Winner::ModelB => format!("{} wins", latest.model_b),
            Winner::Tie => "tie".to_string(),
        };
        println!("  {}", verdict);
        println!(
            "\nScoreboard since {}: {} {} - {} {}",
            state.start, latest.model_a, state.wins_a, latest.model_b, state.wins_b
        );

        let trends = summarize(&report.battles);
        println!(
            "\nLast {} battles: {} wins / {} wins / {} ties",
            trends.total_battles, trends.wins_a, trends.wins_b, trends.ties
        );
        println!(
            "Avg error {:<14} max {} min {} rain% {}",
            latest.model_a,
            fmt(trends.avg_error_a.temp_max),
            fmt(trends.avg_error_a.temp_min),
            fmt(trends.avg_error_a.precip)
        );
        println!(
            "Avg error {:<14} max {} min {} rain% {}",
            latest.model_b,
            fmt(trends.avg_error_b.temp_max),
            fmt(trends.avg_error_b.temp_min),
            fmt(trends.avg_error_b.precip)
        );
    }

    if report.rate_limited {
        println!("\nNote: the weather API rate limit was hit; some battles were skipped.");
    }

    Ok(())
}
