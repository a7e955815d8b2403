use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skycast_core::init()?;

    // Warnings are logged during load; errors abort startup
    let (config, _) = skycast_core::Config::load_validated()?;

    let app = skycast_repository::App::new(config)?;
    let repo = app.repository();

    tracing::info!("SkyCast started");

    println!("SkyCast - Weather Forecasts");
    println!("\nConfiguration:");
    println!("  API: {}", app.config().api.base_url);
    println!("  Database: {}", app.config().storage.database_path().display());
    println!("\nPreferences:");
    println!("  Temperature unit: {}", repo.temperature_unit());
    println!("  Wind speed unit: {}", repo.wind_speed_unit().as_str());
    println!("  Language: {}", repo.language());
    match repo.location() {
        Some((lat, lon)) => println!("  Location: {:.4}, {:.4}", lat, lon),
        None => println!("  Location: not set"),
    }
    println!("\nFavorites: {}", repo.weather_list().await?.len());

    Ok(())
}
