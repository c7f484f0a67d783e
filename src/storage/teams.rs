//! Team name normalization.
//!
//! Historical sources spell the same nation many ways ("West Germany",
//! "Holland", "Zaire"). Names that denote the same football nation share one
//! canonical name and code; successor states that are different nations keep
//! their own code (East Germany, Soviet Union, Yugoslavia, Czechoslovakia).

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::worldcup::TeamInfo;

/// `(lowercase alias, canonical name, code)`
static TEAMS: &[(&str, &str, &str)] = &[
    // Africa
    ("algeria", "Algeria", "ALG"),
    ("angola", "Angola", "ANG"),
    ("cameroon", "Cameroon", "CMR"),
    ("dr congo", "DR Congo", "COD"),
    ("democratic republic of congo", "DR Congo", "COD"),
    ("zaire", "DR Congo", "COD"),
    ("egypt", "Egypt", "EGY"),
    ("ghana", "Ghana", "GHA"),
    ("ivory coast", "Côte d'Ivoire", "CIV"),
    ("cote d'ivoire", "Côte d'Ivoire", "CIV"),
    ("morocco", "Morocco", "MAR"),
    ("nigeria", "Nigeria", "NGA"),
    ("senegal", "Senegal", "SEN"),
    ("south africa", "South Africa", "RSA"),
    ("togo", "Togo", "TOG"),
    ("tunisia", "Tunisia", "TUN"),
    // Asia
    ("australia", "Australia", "AUS"),
    ("china", "China PR", "CHN"),
    ("china pr", "China PR", "CHN"),
    ("india", "India", "IND"),
    ("indonesia", "Indonesia", "IDN"),
    ("dutch east indies", "Indonesia", "IDN"),
    ("iran", "Iran", "IRN"),
    ("ir iran", "Iran", "IRN"),
    ("iraq", "Iraq", "IRQ"),
    ("israel", "Israel", "ISR"),
    ("japan", "Japan", "JPN"),
    ("north korea", "Korea DPR", "PRK"),
    ("korea dpr", "Korea DPR", "PRK"),
    ("south korea", "Korea Republic", "KOR"),
    ("korea republic", "Korea Republic", "KOR"),
    ("korea", "Korea Republic", "KOR"),
    ("kuwait", "Kuwait", "KUW"),
    ("qatar", "Qatar", "QAT"),
    ("saudi arabia", "Saudi Arabia", "KSA"),
    ("united arab emirates", "UAE", "UAE"),
    ("uae", "UAE", "UAE"),
    // Europe
    ("albania", "Albania", "ALB"),
    ("austria", "Austria", "AUT"),
    ("belgium", "Belgium", "BEL"),
    ("bosnia-herzegovina", "Bosnia-Herzegovina", "BIH"),
    ("bosnia and herzegovina", "Bosnia-Herzegovina", "BIH"),
    ("bulgaria", "Bulgaria", "BUL"),
    ("croatia", "Croatia", "CRO"),
    ("czech republic", "Czech Republic", "CZE"),
    ("czechoslovakia", "Czechoslovakia", "TCH"),
    ("denmark", "Denmark", "DEN"),
    ("england", "England", "ENG"),
    ("france", "France", "FRA"),
    ("germany", "Germany", "GER"),
    ("west germany", "Germany", "GER"),
    ("east germany", "East Germany", "GDR"),
    ("greece", "Greece", "GRE"),
    ("hungary", "Hungary", "HUN"),
    ("iceland", "Iceland", "ISL"),
    ("ireland", "Republic of Ireland", "IRL"),
    ("republic of ireland", "Republic of Ireland", "IRL"),
    ("italy", "Italy", "ITA"),
    ("netherlands", "Netherlands", "NED"),
    ("holland", "Netherlands", "NED"),
    ("northern ireland", "Northern Ireland", "NIR"),
    ("norway", "Norway", "NOR"),
    ("poland", "Poland", "POL"),
    ("portugal", "Portugal", "POR"),
    ("romania", "Romania", "ROU"),
    ("russia", "Russia", "RUS"),
    ("scotland", "Scotland", "SCO"),
    ("serbia", "Serbia", "SRB"),
    ("serbia and montenegro", "Serbia and Montenegro", "SCG"),
    ("slovakia", "Slovakia", "SVK"),
    ("slovenia", "Slovenia", "SVN"),
    ("soviet union", "Soviet Union", "URS"),
    ("ussr", "Soviet Union", "URS"),
    ("spain", "Spain", "ESP"),
    ("sweden", "Sweden", "SWE"),
    ("switzerland", "Switzerland", "SUI"),
    ("turkey", "Turkey", "TUR"),
    ("ukraine", "Ukraine", "UKR"),
    ("wales", "Wales", "WAL"),
    ("yugoslavia", "Yugoslavia", "YUG"),
    // North and Central America
    ("canada", "Canada", "CAN"),
    ("costa rica", "Costa Rica", "CRC"),
    ("cuba", "Cuba", "CUB"),
    ("el salvador", "El Salvador", "SLV"),
    ("haiti", "Haiti", "HAI"),
    ("honduras", "Honduras", "HON"),
    ("jamaica", "Jamaica", "JAM"),
    ("mexico", "Mexico", "MEX"),
    ("panama", "Panama", "PAN"),
    ("trinidad and tobago", "Trinidad and Tobago", "TRI"),
    ("united states", "United States", "USA"),
    ("usa", "United States", "USA"),
    // South America
    ("argentina", "Argentina", "ARG"),
    ("bolivia", "Bolivia", "BOL"),
    ("brazil", "Brazil", "BRA"),
    ("chile", "Chile", "CHI"),
    ("colombia", "Colombia", "COL"),
    ("ecuador", "Ecuador", "ECU"),
    ("paraguay", "Paraguay", "PAR"),
    ("peru", "Peru", "PER"),
    ("uruguay", "Uruguay", "URU"),
    ("venezuela", "Venezuela", "VEN"),
    // Oceania
    ("new zealand", "New Zealand", "NZL"),
];

static ABBREVIATIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(?i)\bU\.?S\.?A\b\.?").unwrap(), "USA"),
        (Regex::new(r"(?i)\bU\.S\.").unwrap(), "USA"),
        (Regex::new(r"(?i)\bRep\b\.?").unwrap(), "Republic"),
        (Regex::new(r"(?i)\bDem\b\.?").unwrap(), "Democratic"),
    ]
});

static FILLER_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(the|of|and|republic)\b").unwrap());

/// Canonical identity of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamIdentity {
    pub name: &'static str,
    pub code: &'static str,
}

/// Collapse whitespace and expand common abbreviations.
pub fn normalize_team_name(name: &str) -> String {
    let mut normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
    for (pattern, replacement) in ABBREVIATIONS.iter() {
        normalized = pattern.replace_all(&normalized, *replacement).into_owned();
    }
    normalized.trim().to_string()
}

fn fold_diacritics(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            '’' => '\'',
            other => other,
        })
        .collect()
}

/// Look up the canonical identity for a team name, if known.
pub fn lookup_team(name: &str) -> Option<TeamIdentity> {
    let key = fold_diacritics(&normalize_team_name(name).to_lowercase());
    if key.is_empty() {
        return None;
    }
    TEAMS
        .iter()
        .find(|(alias, _, _)| *alias == key)
        .map(|&(_, name, code)| TeamIdentity { name, code })
}

/// Three-letter fallback code for a team missing from the table.
pub fn generate_team_code(name: &str) -> String {
    let lower = name.to_lowercase();
    let letters: String = FILLER_WORDS
        .replace_all(&lower, "")
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect();
    let mut code: String = letters.chars().take(3).collect();
    while code.chars().count() < 3 {
        code.push('X');
    }
    code
}

/// Canonical `TeamInfo` for a raw name. Unknown names keep their spelling
/// and get a generated code.
pub fn resolve_team(name: &str) -> TeamInfo {
    match lookup_team(name) {
        Some(identity) => TeamInfo {
            name: identity.name.to_string(),
            code: identity.code.to_string(),
        },
        None => {
            let name = normalize_team_name(name);
            let code = generate_team_code(&name);
            warn!("Unknown team {:?}, using generated code {}", name, code);
            TeamInfo { name, code }
        }
    }
}

/// URL-friendly key for a stadium name, e.g. "Estádio do Maracanã" -> "maracana".
pub fn stadium_key(stadium: &str) -> String {
    const PREFIXES: &[&str] = &["arena ", "estádio ", "estadio ", "stadium ", "allianz "];
    const ARTICLES: &[&str] = &["do ", "de ", "la "];

    let lower = stadium.trim().to_lowercase();
    let stripped = PREFIXES
        .iter()
        .find_map(|p| lower.strip_prefix(p))
        .unwrap_or(&lower);
    let stripped = ARTICLES
        .iter()
        .find_map(|a| stripped.strip_prefix(a))
        .unwrap_or(stripped);
    let key: String = fold_diacritics(stripped)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if key.is_empty() {
        "stadium".to_string()
    } else {
        key
    }
}
