use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

/// Relative strength of a competition, on a 0-100 scale. Divisions not in
/// the table fall back to [`FALLBACK_POWER`].
pub static LEAGUE_POWER: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("Premier League", 95.7),
        ("Serie A", 88.9),
        ("La Liga", 88.4),
        ("Bundesliga", 85.6),
        ("Ligue 1", 80.8),
        ("Primeira Liga", 68.8),
        ("Eredivisie", 66.9),
        ("Premiership", 64.2),
        ("Championship", 63.5),
        ("Pro League", 62.3),
        ("Süper Lig", 61.4),
        ("Liga MX", 58.9),
        ("Brasileirão Assaí Série A", 58.6),
        ("Russian Premier League", 56.8),
        ("Serie B", 55.2),
        ("Ekstraklasa", 54.7),
        ("Liga Profesional de Fútbol", 54.3),
        ("Liga Portugal 2", 53.8),
        ("K League 1", 53.4),
        ("Ukrainian Premier League", 52.9),
        ("Liga BetPlay Dimayor", 52.4),
        ("Czech First League", 51.9),
        ("Austrian Football Bundesliga", 51.4),
        ("Swiss Super League", 50.9),
        ("Liga Nacional", 50.4),
        ("Fortuna liga", 49.9),
        ("First League", 49.4),
        ("SuperLiga", 48.9),
        ("HNL", 48.4),
        ("Liga I", 47.9),
        ("Ligue Professionnelle 1 Mobilis", 47.4),
        ("Liga 1", 46.9),
        ("Israeli Premier League", 46.4),
        ("Liga FPD", 45.9),
        ("Premier Division", 45.4),
        ("Yelo League", 44.9),
        ("Kategoria Superiore", 43.4),
        ("League of Ireland Premier Division", 41.9),
        ("Veikkausliiga", 41.4),
        ("Allsvenskan", 40.9),
        ("Danish Superliga", 40.4),
        ("Tippeligaen", 39.9),
        ("Liga Primera", 38.9),
        ("Liga de Fútbol Profesional", 38.4),
        ("A-League", 36.9),
        ("J1 League", 36.4),
        ("Chinese Super League", 35.9),
    ])
});

/// Power rating applied to any division missing from the table.
pub const FALLBACK_POWER: f64 = 5.0;

/// Exact-string repairs for division names: mis-decoded accented characters
/// from the export encoding, plus regional sub-leagues collapsed to their
/// parent competition.
pub static DIVISION_NAME_FIXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("BrasileirÃ£o AssaÃ­ SÃ©rie A", "Brasileirão Assaí Série A"),
        ("Liga Profesional de FÃºtbol", "Liga Profesional de Fútbol"),
        ("Primera FederaciÃ³n Grupo I", "Primera Federación Grupo"),
        ("Primera FederaciÃ³n Grupo III", "Primera Federación Grupo"),
        ("Primera FederaciÃ³n Grupo IV", "Primera Federación Grupo"),
        ("Primera FederaciÃ³n Grupo V", "Primera Federación Grupo"),
        ("Primera FederaciÃ³n Grupo VI", "Primera Federación Grupo"),
        ("Primera FederaciÃ³n Grupo VII", "Primera Federación Grupo"),
        ("Regionalliga SÃ¼dwest", "Regionalliga Südwest"),
        ("Serie C NOW Girone A", "Serie C NOW"),
        ("Serie C NOW Girone B", "Serie C NOW"),
        ("Serie C NOW Girone C", "Serie C NOW"),
        ("Spor Toto SÃ¼per Lig", "Spor Toto Süper Lig"),
        ("French National 3 - Group A", "French National 3"),
        ("French National 3 - Group B", "French National 3"),
        ("French National 3 - Group C", "French National 3"),
        ("French National 3 - Group D", "French National 3"),
        ("French National 3 - Group E", "French National 3"),
        ("French National 3 - Group F", "French National 3"),
        ("French National 3 - Group G", "French National 3"),
        ("French National 3 - Group H", "French National 3"),
        ("French National 3 - Group I", "French National 3"),
        ("French National 3 - Group J", "French National 3"),
        ("French National 3 - Group K", "French National 3"),
        ("French National 3 - Group L", "French National 3"),
        ("BrasileirÃ£o Serie B Chevrolet", "Brasileirão Serie B Chevrolet"),
        ("Serie D Girone A", "Serie D"),
        ("Serie D Girone B", "Serie D"),
        ("Serie D Girone C", "Serie D"),
        ("Serie D Girone D", "Serie D"),
        ("Serie D Girone E", "Serie D"),
        ("Serie D Girone F", "Serie D"),
        ("Serie D Girone G", "Serie D"),
        ("Serie D Girone H", "Serie D"),
        ("Serie D Girone I", "Serie D"),
        ("Serie D Girone J", "Serie D"),
        ("Serie D Girone K", "Serie D"),
        ("Regionalliga West", "Regionalliga"),
        ("Regionalliga Nord", "Regionalliga"),
        ("Regionalliga Südwest", "Regionalliga"),
        ("Regionalliga Bayern", "Regionalliga"),
        ("Regionalliga Nordost", "Regionalliga"),
        ("Russian Second Division A Gold", "Russian Second Division A"),
        ("Russian Second Division A Silver", "Russian Second Division A"),
        ("Russian Second Division A Bronze", "Russian Second Division A"),
        ("Russian Second Division B - Group 1", "Russian Second Division B"),
        ("Russian Second Division B - Group 2", "Russian Second Division B"),
        ("Russian Second Division B - Group 3", "Russian Second Division B"),
        ("DR Congo Premier Division A", "DR Congolese Premier Division"),
        ("DR Congo Premier Division B", "DR Congolese Premier Division"),
    ])
});

pub fn power_for(division: &str, overrides: &HashMap<String, f64>) -> f64 {
    if let Some(power) = overrides.get(division) {
        return *power;
    }
    LEAGUE_POWER
        .get(division)
        .copied()
        .unwrap_or(FALLBACK_POWER)
}

/// Rating multiplier for a division: power / 100.
pub fn multiplier_for(division: &str, overrides: &HashMap<String, f64>) -> f64 {
    power_for(division, overrides) / 100.0
}

/// Optional override file merged over the builtin power table:
/// `{ "league_power": { "Premier League": 97.0 } }`.
#[derive(Debug, Default, Deserialize)]
pub struct PowerOverrideFile {
    #[serde(default)]
    pub league_power: HashMap<String, f64>,
}

pub fn load_power_overrides(path: &Path) -> Result<HashMap<String, f64>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read league power overrides from {}", path.display()))?;
    let parsed: PowerOverrideFile =
        serde_json::from_str(&raw).context("parse league power overrides")?;
    Ok(parsed.league_power)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_division_multiplier() {
        let overrides = HashMap::new();
        assert_eq!(multiplier_for("Premier League", &overrides), 0.957);
        assert_eq!(multiplier_for("Serie A", &overrides), 0.889);
    }

    #[test]
    fn unknown_division_falls_back() {
        let overrides = HashMap::new();
        assert_eq!(multiplier_for("Sunday League", &overrides), 0.05);
    }

    #[test]
    fn override_wins_over_builtin() {
        let overrides = HashMap::from([("Premier League".to_string(), 80.0)]);
        assert_eq!(multiplier_for("Premier League", &overrides), 0.8);
        assert_eq!(multiplier_for("Serie A", &overrides), 0.889);
    }

    #[test]
    fn sub_league_names_collapse() {
        assert_eq!(
            DIVISION_NAME_FIXES.get("Serie D Girone H"),
            Some(&"Serie D")
        );
        assert_eq!(
            DIVISION_NAME_FIXES.get("Regionalliga Nordost"),
            Some(&"Regionalliga")
        );
    }
}
