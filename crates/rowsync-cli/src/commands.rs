//! The sync command: wire configuration, transports, and the driver.

use std::fs;

use anyhow::{Context, Result, bail};
use tracing::info;

use rowsync_geo::GoogleGeocoder;
use rowsync_ingest::{RowExclusion, read_source};
use rowsync_model::{
    CollectionSpec, FieldSpec, GeoMode, IdentitySpec, LookupMatch, RunSummary,
};
use rowsync_store::StoreClient;
use rowsync_sync::{SyncDriver, SyncOptions};

use crate::cli::{AuthModeArg, Cli, GeocodeArg, NameMatchArg};

pub fn run_sync(cli: &Cli) -> Result<RunSummary> {
    let mut spec = load_layout(cli)?;
    if let Some(collection) = &cli.collection {
        spec.collection = collection.clone();
    }
    apply_name_match(&mut spec, cli.name_match);

    let table = read_source(&cli.source)
        .with_context(|| format!("read source: {}", cli.source.display()))?;

    let mut store = StoreClient::new(&cli.base_url).context("create store client")?;
    if cli.auth == AuthModeArg::Admin && !cli.dry_run {
        let (Some(email), Some(password)) = (&cli.email, &cli.password) else {
            bail!(
                "admin credentials required for --auth admin \
                 (use --email/--password or PB_ADMIN_EMAIL/PB_ADMIN_PASSWORD)"
            );
        };
        store
            .authenticate(email, password)
            .context("authenticate against store")?;
        info!(base_url = %cli.base_url, "authenticated as admin");
    }

    let geocoder = build_geocoder(cli)?;
    let options = SyncOptions {
        relation_id: cli.relation_id.clone(),
        geo_mode: geo_mode(cli.geocode),
        dry_run: cli.dry_run,
        exclusion: cli.exclude_column.as_ref().map(|column| RowExclusion {
            column: column.clone(),
            value: cli.exclude_value.clone(),
        }),
    };

    let mut driver = SyncDriver::new(&store, &spec).with_options(options);
    if let Some(geocoder) = geocoder.as_ref() {
        driver = driver.with_geocoder(geocoder);
    }
    driver.run(&table).context("sync run")
}

fn build_geocoder(cli: &Cli) -> Result<Option<GoogleGeocoder>> {
    if cli.geocode == GeocodeArg::Off {
        return Ok(None);
    }
    let Some(api_key) = &cli.api_key else {
        bail!("geocoding API key required (use --api-key or GOOGLE_MAPS_API_KEY)");
    };
    let geocoder = GoogleGeocoder::new(api_key)
        .context("build geocoder")?
        .with_region(cli.region.clone());
    Ok(Some(geocoder))
}

fn geo_mode(arg: GeocodeArg) -> Option<GeoMode> {
    match arg {
        GeocodeArg::Off => None,
        GeocodeArg::Coordinates => Some(GeoMode::Coordinates),
        GeocodeArg::District => Some(GeoMode::District),
    }
}

fn load_layout(cli: &Cli) -> Result<CollectionSpec> {
    match &cli.layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read layout: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse layout: {}", path.display()))
        }
        None => Ok(default_item_layout()),
    }
}

/// The built-in item-catalog layout, covering the column variants seen in
/// the wastage/item report exports.
fn default_item_layout() -> CollectionSpec {
    CollectionSpec {
        collection: "Form_Items".to_string(),
        fields: vec![
            FieldSpec::text("Item_Code", &["Item_Code", "Item Code", "Code", "ID", "Id"]),
            FieldSpec::text("Item_Name", &["Item_Name", "Item Name", "Item", "Name"]),
            FieldSpec::text("Unit", &["Unit", "UOM", "UoM"]),
            FieldSpec::relation(
                "Form",
                &["Form", "Form_Id", "Form_ID", "Form_Ids", "Form_IDs"],
            ),
        ],
        identity: vec![
            IdentitySpec::exact("Item_Code"),
            IdentitySpec::exact("Item_Name"),
        ],
        identity_as_record_id: false,
        relation_field: Some("Form".to_string()),
        address_field: None,
    }
}

/// Applies the name-match knob to every fallback identity lookup. The
/// primary (code) lookup always stays exact.
fn apply_name_match(spec: &mut CollectionSpec, arg: NameMatchArg) {
    let mode = match arg {
        NameMatchArg::Exact => LookupMatch::Exact,
        NameMatchArg::Contains => LookupMatch::Contains,
    };
    for identity in spec.identity.iter_mut().skip(1) {
        identity.match_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_targets_the_item_collection() {
        let layout = default_item_layout();
        assert_eq!(layout.collection, "Form_Items");
        assert_eq!(layout.identity[0].field, "Item_Code");
        assert_eq!(layout.relation_field.as_deref(), Some("Form"));
        assert!(layout.field("Unit").is_some());
    }

    #[test]
    fn name_match_knob_spares_the_primary_lookup() {
        let mut layout = default_item_layout();
        apply_name_match(&mut layout, NameMatchArg::Contains);
        assert_eq!(layout.identity[0].match_mode, LookupMatch::Exact);
        assert_eq!(layout.identity[1].match_mode, LookupMatch::Contains);
    }

    #[test]
    fn layout_file_round_trips_through_json() {
        let layout = default_item_layout();
        let json = serde_json::to_string_pretty(&layout).expect("serialize layout");
        let parsed: CollectionSpec = serde_json::from_str(&json).expect("parse layout");
        assert_eq!(parsed.collection, layout.collection);
        assert_eq!(parsed.fields.len(), layout.fields.len());
    }
}
