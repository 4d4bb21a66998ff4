use crate::infra::load_catalog_strict;
use clap::Args;
use rent_estimator::config::AppConfig;
use rent_estimator::error::AppError;
use rent_estimator::estimate::{
    AmenityFlags, EstimateRequest, EstimateService, ModelGateway, PredictionRecord,
};
use rent_estimator::features::{FeatureLabels, FeatureMapper};
use rent_estimator::location::{LocationCatalog, LocationSelection, Resolution};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct LocateArgs {
    /// Geo data file (defaults to GEO_DATA_PATH)
    #[arg(long)]
    pub(crate) geo_data: Option<PathBuf>,
    /// Postal code to look up; takes precedence over --state/--city
    #[arg(long)]
    pub(crate) postal_code: Option<String>,
    /// State to select
    #[arg(long)]
    pub(crate) state: Option<String>,
    /// City within the selected state
    #[arg(long, requires = "state")]
    pub(crate) city: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Geo data file (defaults to GEO_DATA_PATH)
    #[arg(long)]
    pub(crate) geo_data: Option<PathBuf>,
    /// Model-serving endpoint (defaults to MODEL_ENDPOINT)
    #[arg(long)]
    pub(crate) model_endpoint: Option<String>,
    #[arg(long)]
    pub(crate) postal_code: Option<String>,
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Living space in square meters
    #[arg(long, default_value_t = 60.0)]
    pub(crate) living_space: f64,
    /// Number of rooms, in steps of 0.5
    #[arg(long, default_value_t = 2.0)]
    pub(crate) rooms: f64,
    /// Floor (0 = ground floor, -1 = basement)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub(crate) floor: i32,
    /// Construction year; 0 when unknown
    #[arg(long, default_value_t = 2000)]
    pub(crate) year: u16,
    #[arg(long, default_value = "Zentralheizung")]
    pub(crate) heating: String,
    #[arg(long, default_value = "Gepflegt")]
    pub(crate) condition: String,
    #[arg(long, default_value = "Normal")]
    pub(crate) interior_quality: String,
    #[arg(long, default_value = "Etagenwohnung")]
    pub(crate) flat_type: String,
    #[arg(long)]
    pub(crate) balcony: bool,
    #[arg(long)]
    pub(crate) kitchen: bool,
    #[arg(long)]
    pub(crate) lift: bool,
    #[arg(long)]
    pub(crate) garden: bool,
    #[arg(long)]
    pub(crate) cellar: bool,
    /// Print the prediction record as CSV instead of calling the model
    #[arg(long)]
    pub(crate) record_only: bool,
}

impl EstimateArgs {
    fn request(&self) -> EstimateRequest {
        EstimateRequest {
            location: LocationSelection {
                state: self.state.clone(),
                city: self.city.clone(),
                postal_code: self.postal_code.clone(),
            },
            living_space: self.living_space,
            rooms: self.rooms,
            floor: self.floor,
            year_constructed: Some(self.year),
            features: FeatureLabels {
                heating: self.heating.clone(),
                condition: self.condition.clone(),
                interior_quality: self.interior_quality.clone(),
                flat_type: self.flat_type.clone(),
            },
            amenities: AmenityFlags {
                balcony: self.balcony,
                kitchen: self.kitchen,
                lift: self.lift,
                garden: self.garden,
                cellar: self.cellar,
            },
        }
    }
}

pub(crate) fn run_locate(args: LocateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = args.geo_data.unwrap_or(config.data.geo_data_path);
    let catalog = load_catalog_strict(&path, config.location_defaults)?;

    let resolver = catalog.resolver();
    let resolution = match (&args.postal_code, &args.state) {
        (Some(code), _) => resolver.on_postal_code(&LocationSelection::unresolved(), code),
        (None, Some(_)) => resolver.reconcile(&LocationSelection {
            state: args.state.clone(),
            city: args.city.clone(),
            postal_code: None,
        }),
        (None, None) => catalog.initial_selection(),
    };

    render_resolution(&catalog, &resolution);
    Ok(())
}

pub(crate) fn render_resolution(catalog: &LocationCatalog, resolution: &Resolution) {
    let selection = &resolution.selection;
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("Location selection ({:?})", resolution.outcome);
    println!("  Bundesland: {}", show(&selection.state));
    println!("  Stadt:      {}", show(&selection.city));
    println!("  PLZ:        {}", show(&selection.postal_code));

    let resolver = catalog.resolver();
    let cities = resolver.cities(selection);
    if !cities.is_empty() {
        println!("\nCities ({})", cities.len());
        for city in cities {
            println!("  - {}", city);
        }
    }
    let postal_codes = resolver.postal_codes(selection);
    if !postal_codes.is_empty() {
        println!("\nPostal codes: {}", postal_codes.join(", "));
    }
}

pub(crate) fn run_vocabulary() -> Result<(), AppError> {
    let mapper = FeatureMapper::standard()?;
    for category in mapper.vocabulary() {
        println!("{} ({})", category.caption, category.column);
        for entry in category.entries {
            println!("  {:<16} -> {}", entry.label, entry.code);
        }
    }
    Ok(())
}

pub(crate) async fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(endpoint) = args.model_endpoint.clone() {
        config.model.endpoint = Some(endpoint);
    }
    let path = args
        .geo_data
        .clone()
        .unwrap_or_else(|| config.data.geo_data_path.clone());

    let catalog = load_catalog_strict(&path, config.location_defaults.clone())?;
    let gateway = ModelGateway::from_config(&config.model)?;
    let service = EstimateService::new(
        Arc::new(catalog),
        FeatureMapper::standard()?,
        Arc::new(gateway),
    );
    let request = args.request();

    if args.record_only {
        let record = service.preview_at(&request, chrono::Local::now().naive_local())?;
        return write_record_csv(&record);
    }

    let estimate = service.estimate(&request).await?;
    println!("Geschätzte Kaltmiete: {:.2} €", estimate.estimate);
    println!(
        "für {} m² in {} ({})",
        estimate.living_space, estimate.city, estimate.record.postal_code
    );
    Ok(())
}

fn write_record_csv(record: &PredictionRecord) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    record.write_csv(stdout.lock())?;
    Ok(())
}
