// Weather Dashboard v0.1
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_dashboard::services::capitals::{self, CapitalsBoard, TICK_PERIOD};
use weather_dashboard::services::clock::clock_time;
use weather_dashboard::services::dashboard::{Dashboard, DashboardView};
use weather_dashboard::services::geocoding::GeocodingClient;
use weather_dashboard::services::weather::WeatherClient;
use weather_dashboard::{AppConfig, AppError};

/// How often the capitals table is written to the log.
const BOARD_LOG_PERIOD_SECS: u64 = 10;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;

    let geocoder = GeocodingClient::new(&config)?;
    let weather = WeatherClient::new(&config)?;

    // Optional one-off city search
    if let Some(city) = config.dashboard_city.as_deref() {
        let state = config.dashboard_state.as_deref();
        let dashboard = Dashboard::new(geocoder.clone(), weather.clone(), config.forecast_days);
        let mut current: Option<DashboardView> = None;
        Dashboard::apply(&mut current, dashboard.search_city(city, state).await);
        if let Some(view) = &current {
            log_dashboard(view);
        }
    }

    // Capitals board: one weather refresh plus a live clock
    let board = CapitalsBoard::shared();
    let ticker = capitals::start_ticker(board.clone(), TICK_PERIOD);
    capitals::refresh_weather(&board, &weather).await;

    let mut log_interval =
        tokio::time::interval(std::time::Duration::from_secs(BOARD_LOG_PERIOD_SECS));
    loop {
        tokio::select! {
            _ = log_interval.tick() => {
                log_board(&*board.read().await);
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
    }

    ticker.stop();
    tracing::info!("Shutting down");
    Ok(())
}

fn log_dashboard(view: &DashboardView) {
    let current = &view.snapshot.current;
    tracing::info!(
        "{} ({:.4}, {:.4}): {}°C, {}, humidity {}%, precipitation {} mm, cloud {}%, UV {}",
        view.label,
        view.coordinate.latitude,
        view.coordinate.longitude,
        current.temp_c,
        current.condition.text,
        current.humidity,
        current.precip_mm,
        current.cloud,
        current.uv
    );
    tracing::info!("Wind: {} km/h ({})", current.wind_kph, view.wind_description);

    if let Some(today) = view.snapshot.today() {
        tracing::info!(
            "Today: max {}°C, min {}°C, sunrise {}, sunset {}",
            today.day.maxtemp_c,
            today.day.mintemp_c,
            today.astro.sunrise,
            today.astro.sunset
        );
    }
    for day in &view.snapshot.forecast.forecastday {
        tracing::info!(
            "{}: {}°C / {}°C, {}",
            day.date,
            day.day.maxtemp_c,
            day.day.mintemp_c,
            day.day.condition.text
        );
    }
    for alert in &view.alerts {
        tracing::warn!("{}", alert);
    }
}

fn log_board(board: &CapitalsBoard) {
    for (entry, status) in board.rows() {
        let temperature = status
            .temperature_c
            .map(|t| format!("{}°C", t))
            .unwrap_or_else(|| "-".to_string());
        let local_time = status
            .local_time
            .as_deref()
            .map(clock_time)
            .unwrap_or("Loading...");
        tracing::info!(
            "{}, {}: {} at {}",
            entry.display_name,
            entry.country_name,
            temperature,
            local_time
        );
    }
}
