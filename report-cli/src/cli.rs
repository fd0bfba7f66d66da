use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use report_core::{
    Config, WeatherQuery, pipeline,
    provider::{covid_provider_from_config, weather_provider_from_config},
};
use std::path::PathBuf;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "report", version, about = "Weather chart and COVID-19 report generator")]
pub struct Cli {
    /// Read settings from this file instead of the platform config directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plot the average daily temperature of the last seven days.
    Weather,

    /// Fetch current COVID-19 figures, chart them and write the PDF report.
    Covid,

    /// Interactively set the city, coordinates and country.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = self.load_config()?;

        match self.command {
            Command::Weather => run_weather(&config).await,
            Command::Covid => run_covid(&config).await,
            Command::Configure => self.configure(config),
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn configure(&self, mut config: Config) -> Result<()> {
        let weather = &mut config.weather;
        weather.city = Text::new("City name:").with_default(&weather.city).prompt()?;
        weather.latitude = CustomType::<f64>::new("Latitude:")
            .with_default(weather.latitude)
            .with_error_message("Please type a decimal number, e.g. 19.076")
            .prompt()?;
        weather.longitude = CustomType::<f64>::new("Longitude:")
            .with_default(weather.longitude)
            .with_error_message("Please type a decimal number, e.g. 72.8777")
            .prompt()?;

        let covid = &mut config.covid;
        covid.country = Text::new("Country (exact upstream spelling):")
            .with_default(&covid.country)
            .prompt()?;

        let path = match &self.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("Configuration saved to {}", path.display());

        Ok(())
    }
}

async fn run_weather(config: &Config) -> Result<()> {
    let settings = &config.weather;
    let query = WeatherQuery::last_week(settings, Local::now().date_naive());

    println!(
        "Fetching weather data for {} → {} ...",
        query.start_date, query.end_date
    );
    let provider = weather_provider_from_config(config)?;
    let report = pipeline::weather_report(provider.as_ref(), &query, &settings.output)
        .await
        .with_context(|| format!("Weather chart for {} failed", settings.city))?;

    println!("Received data points: {}", report.series.len());
    println!("✅ Chart saved as {}", report.chart.path().display());

    Ok(())
}

async fn run_covid(config: &Config) -> Result<()> {
    let settings = &config.covid;

    println!("Fetching COVID-19 data for {}...", settings.country);
    let provider = covid_provider_from_config(config)?;
    let report = match pipeline::covid_report(provider.as_ref(), settings).await {
        Ok(report) => report,
        Err(err) if err.is_fetch() => {
            return Err(err).context(format!("Error fetching data for {}", settings.country));
        }
        Err(err) => return Err(err).context("Report generation failed"),
    };

    println!("✅ Chart saved as {}", settings.chart_output.display());
    if !report.report.embedded_chart {
        println!("⚠️  Chart image was not available; report written without it");
    }
    println!("✅ PDF report saved as {}", report.report.path.display());
    println!("🎉 Report generation completed successfully!");

    Ok(())
}
