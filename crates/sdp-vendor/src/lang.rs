//! Three-letter vendor language codes to two-letter codes.
//!
//! The two vendors use overlapping but different code lists (HERE has
//! transliteration variants such as `RUX`, MultiNet has Latin variants such
//! as `RUL`).  Codes without a two-letter equivalent, and unknown codes,
//! map to an empty string.

/// HERE `ST_LANGCD` / `LANG_CODE`.
pub fn here(code: &str) -> &'static str {
    match code {
        "ALB" => "sq",
        "AMT" => "hy",
        "ARA" => "ar",
        "ARE" => "en",
        "ARM" => "hy",
        "ARX" => "hy",
        "ASM" => "as",
        "ASX" => "as",
        "AZE" => "az",
        "AZX" => "az",
        "BAQ" => "eu",
        "BEL" => "be",
        "BEN" => "bn",
        "BET" => "be",
        "BEX" => "be",
        "BGX" => "bn",
        "BOS" => "bs",
        "BOX" => "bs",
        "BUL" => "bg",
        "BUT" => "bg",
        "BUX" => "bg",
        "CAT" => "ca",
        "CHI" => "zh",
        "CHT" => "zh",
        "CZE" => "cs",
        "CZX" => "cs",
        "DAN" => "da",
        "DUT" => "nl",
        "ENG" => "en",
        "EST" => "et",
        "ESX" => "et",
        "FAO" => "fo",
        "FIN" => "fi",
        "FRE" => "fr",
        "GEO" => "ka",
        "GER" => "de",
        "GET" => "ka",
        "GEX" => "ka",
        "GJX" => "gu",
        "GLE" => "ga",
        "GLG" => "gl",
        "GRE" => "el",
        "GRN" => "gn",
        "GRT" => "el",
        "GRX" => "el",
        "GUJ" => "gu",
        "HEB" => "he",
        "HIN" => "hi",
        "HUN" => "hu",
        "HUX" => "hu",
        "ICE" => "is",
        "IND" => "id",
        "ITA" => "it",
        "JPN" => "ja",
        "KAN" => "kn",
        "KAT" => "kk",
        "KAX" => "kk",
        "KAZ" => "kk",
        "KIR" => "ky",
        "KIT" => "ky",
        "KIX" => "ky",
        "KNX" => "kn",
        "KOR" => "ko",
        "KOX" => "ko",
        "LAV" => "lv",
        "LAX" => "lv",
        "LIT" => "lt",
        "LIX" => "lt",
        "MAC" => "mk",
        "MAL" => "ml",
        "MAR" => "mr",
        "MAT" => "mk",
        "MAY" => "ms",
        "MGX" => "mn",
        "MLT" => "mt",
        "MLX" => "mt",
        "MOL" => "mo",
        "MON" => "mn",
        "MOX" => "mo",
        "MRX" => "mr",
        "MYX" => "ml",
        "NOR" => "no",
        "ORI" => "or",
        "ORX" => "or",
        "PAN" => "pa",
        "PNX" => "pa",
        "POL" => "pl",
        "POR" => "pt",
        "POX" => "pl",
        "PYN" => "zh",
        "RMX" => "ro",
        "RST" => "ru",
        "RUM" => "ro",
        "RUS" => "ru",
        "RUX" => "ru",
        "SCR" => "sh",
        "SCT" => "sr",
        "SCX" => "sr",
        "SIX" => "sv",
        "SLO" => "sk",
        "SLV" => "sv",
        "SLX" => "sk",
        "SPA" => "es",
        "SRB" => "sr",
        "SRX" => "sh",
        "SWE" => "sv",
        "TAM" => "ta",
        "TEL" => "te",
        "THA" => "th",
        "THE" => "en",
        "TKT" => "tr",
        "TLX" => "te",
        "TMX" => "ta",
        "TUR" => "tr",
        "TUX" => "tr",
        "TWE" => "en",
        "UKR" => "uk",
        "UKT" => "uk",
        "UKX" => "uk",
        "URD" => "ur",
        "UZB" => "uz",
        "VIE" => "vi",
        "WEL" => "cy",
        "WEN" => "en",
        _ => "",
    }
}

/// MultiNet `TXTCONTLC`.
pub fn multinet(code: &str) -> &'static str {
    match code {
        "ALB" => "sq",
        "ARA" => "ar",
        "BAQ" => "eu",
        "BEL" => "be",
        "BET" => "be",
        "BOS" => "bs",
        "BRE" => "br",
        "BUL" => "bg",
        "BUN" => "bg",
        "BUR" => "my",
        "CAT" => "ca",
        "CHI" => "zh",
        "CHL" => "zh",
        "CHT" => "zh",
        "CTN" => "zh",
        "CZE" => "cs",
        "DAN" => "da",
        "DUT" => "nl",
        "ENG" => "en",
        "EST" => "et",
        "FAO" => "fo",
        "FIN" => "fi",
        "FRE" => "fr",
        "FRY" => "fy",
        "GER" => "de",
        "GLA" => "gd",
        "GLE" => "ga",
        "GLG" => "gl",
        "GRE" => "el",
        "GRL" => "el",
        "HEB" => "he",
        "HIN" => "hi",
        "HUN" => "hu",
        "ICE" => "is",
        "IND" => "id",
        "ITA" => "it",
        "KHM" => "km",
        "KOL" => "ko",
        "KOR" => "ko",
        "LAO" => "lo",
        "LAT" => "la",
        "LAV" => "lv",
        "LIT" => "lt",
        "LTZ" => "lb",
        "MAC" => "mk",
        "MAT" => "mk",
        "MAY" => "ms",
        "MLT" => "mt",
        "MOL" => "mo",
        "NOR" => "no",
        "OCI" => "oc",
        "POL" => "pl",
        "POR" => "pt",
        "ROH" => "rm",
        "RUL" => "ru",
        "RUM" => "ro",
        "RUS" => "ru",
        "SCC" => "sh",
        "SCO" => "gd",
        "SCR" => "sh",
        "SCY" => "sh",
        "SLA" => "cu",
        "SLO" => "sk",
        "SLV" => "sv",
        "SMI" => "se",
        "SPA" => "es",
        "SRD" => "sc",
        "SWE" => "sv",
        "THA" => "th",
        "THL" => "th",
        "TUR" => "tr",
        "UKL" => "uk",
        "UKR" => "uk",
        "VAL" => "ca",
        "VIE" => "vi",
        "WEL" => "cy",
        _ => "",
    }
}
