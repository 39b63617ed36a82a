//! Clock and timezone resolution.
//!
//! Every function in here is total: failure is signalled with `None` so that
//! the caller can ask the user again instead of aborting.

use chrono::{prelude::*, Duration};
use chrono_tz::{Africa, America, Asia, Atlantic, Australia, Europe, Tz, TZ_VARIANTS};
use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// A closest city fallback further away than this is not trusted
const CLOSEST_MATCH_MAX_KM: f64 = 1500.0;
const EARTH_RADIUS_KM: f64 = 6371.0;

struct City {
    names: &'static [&'static str],
    tz: Tz,
    lat: f64,
    lon: f64,
}

macro_rules! city {
    ([$($name:expr),+], $tz:expr, $lat:expr, $lon:expr) => {
        City {
            names: &[$($name),+],
            tz: $tz,
            lat: $lat,
            lon: $lon,
        }
    };
}

static CITIES: &[City] = &[
    city!(["moscow", "москва", "msk"], Europe::Moscow, 55.7558, 37.6173),
    city!(
        ["saint petersburg", "st petersburg", "petersburg", "санкт-петербург", "питер", "спб"],
        Europe::Moscow,
        59.9343,
        30.3351
    ),
    city!(["kazan", "казань"], Europe::Moscow, 55.7963, 49.1088),
    city!(["nizhny novgorod", "нижний новгород"], Europe::Moscow, 56.2965, 43.9361),
    city!(["rostov-on-don", "rostov", "ростов-на-дону", "ростов"], Europe::Moscow, 47.2357, 39.7015),
    city!(["sochi", "сочи"], Europe::Moscow, 43.5855, 39.7231),
    city!(["volgograd", "волгоград"], Europe::Volgograd, 48.7080, 44.5133),
    city!(["samara", "самара"], Europe::Samara, 53.1959, 50.1002),
    city!(["saratov", "саратов"], Europe::Saratov, 51.5336, 46.0343),
    city!(["ulyanovsk", "ульяновск"], Europe::Ulyanovsk, 54.3142, 48.4031),
    city!(["astrakhan", "астрахань"], Europe::Astrakhan, 46.3497, 48.0408),
    city!(["kaliningrad", "калининград"], Europe::Kaliningrad, 54.7104, 20.4522),
    city!(["yekaterinburg", "ekaterinburg", "екатеринбург"], Asia::Yekaterinburg, 56.8389, 60.6057),
    city!(["chelyabinsk", "челябинск"], Asia::Yekaterinburg, 55.1644, 61.4368),
    city!(["ufa", "уфа"], Asia::Yekaterinburg, 54.7388, 55.9721),
    city!(["perm", "пермь"], Asia::Yekaterinburg, 58.0105, 56.2502),
    city!(["tyumen", "тюмень"], Asia::Yekaterinburg, 57.1522, 65.5272),
    city!(["omsk", "омск"], Asia::Omsk, 54.9885, 73.3242),
    city!(["novosibirsk", "новосибирск"], Asia::Novosibirsk, 55.0084, 82.9357),
    city!(["tomsk", "томск"], Asia::Tomsk, 56.4846, 84.9476),
    city!(["barnaul", "барнаул"], Asia::Barnaul, 53.3548, 83.7698),
    city!(["kemerovo", "кемерово"], Asia::Novokuznetsk, 55.3547, 86.0873),
    city!(["novokuznetsk", "новокузнецк"], Asia::Novokuznetsk, 53.7557, 87.1099),
    city!(["krasnoyarsk", "красноярск"], Asia::Krasnoyarsk, 56.0153, 92.8932),
    city!(["irkutsk", "иркутск"], Asia::Irkutsk, 52.2870, 104.3050),
    city!(["chita", "чита"], Asia::Chita, 52.0515, 113.4712),
    city!(["yakutsk", "якутск"], Asia::Yakutsk, 62.0355, 129.6755),
    city!(["vladivostok", "владивосток"], Asia::Vladivostok, 43.1155, 131.8855),
    city!(["khabarovsk", "хабаровск"], Asia::Vladivostok, 48.4802, 135.0719),
    city!(["magadan", "магадан"], Asia::Magadan, 59.5612, 150.8301),
    city!(["yuzhno-sakhalinsk", "южно-сахалинск"], Asia::Sakhalin, 46.9591, 142.7380),
    city!(
        ["petropavlovsk-kamchatsky", "петропавловск-камчатский"],
        Asia::Kamchatka,
        53.0452,
        158.6483
    ),
    city!(["minsk", "минск"], Europe::Minsk, 53.9006, 27.5590),
    city!(["kyiv", "kiev", "киев", "київ"], Europe::Kiev, 50.4501, 30.5234),
    city!(["riga", "рига"], Europe::Riga, 56.9496, 24.1052),
    city!(["vilnius", "вильнюс"], Europe::Vilnius, 54.6872, 25.2797),
    city!(["tallinn", "таллин"], Europe::Tallinn, 59.4370, 24.7536),
    city!(["chisinau", "chișinău", "кишинев"], Europe::Chisinau, 47.0105, 28.8638),
    city!(["tbilisi", "тбилиси"], Asia::Tbilisi, 41.7151, 44.8271),
    city!(["yerevan", "ереван"], Asia::Yerevan, 40.1792, 44.4991),
    city!(["baku", "баку"], Asia::Baku, 40.4093, 49.8671),
    city!(["almaty", "алматы", "алма-ата"], Asia::Almaty, 43.2220, 76.8512),
    city!(["astana", "астана"], Asia::Almaty, 51.1694, 71.4491),
    city!(["tashkent", "ташкент"], Asia::Tashkent, 41.2995, 69.2401),
    city!(["bishkek", "бишкек"], Asia::Bishkek, 42.8746, 74.5698),
    city!(["dushanbe", "душанбе"], Asia::Dushanbe, 38.5598, 68.7870),
    city!(["istanbul", "стамбул"], Europe::Istanbul, 41.0082, 28.9784),
    city!(["london", "лондон"], Europe::London, 51.5074, -0.1278),
    city!(["dublin"], Europe::Dublin, 53.3498, -6.2603),
    city!(["paris", "париж"], Europe::Paris, 48.8566, 2.3522),
    city!(["berlin", "берлин"], Europe::Berlin, 52.5200, 13.4050),
    city!(["munich", "münchen", "мюнхен"], Europe::Berlin, 48.1351, 11.5820),
    city!(["zurich", "zürich"], Europe::Zurich, 47.3769, 8.5417),
    city!(["vienna", "wien", "вена"], Europe::Vienna, 48.2082, 16.3738),
    city!(["prague", "praha", "прага"], Europe::Prague, 50.0755, 14.4378),
    city!(["warsaw", "warszawa", "варшава"], Europe::Warsaw, 52.2297, 21.0122),
    city!(["krakow", "kraków"], Europe::Warsaw, 50.0647, 19.9450),
    city!(["rome", "roma", "рим"], Europe::Rome, 41.9028, 12.4964),
    city!(["madrid", "мадрид"], Europe::Madrid, 40.4168, -3.7038),
    city!(["lisbon", "lisboa", "лиссабон"], Europe::Lisbon, 38.7223, -9.1393),
    city!(["amsterdam", "амстердам"], Europe::Amsterdam, 52.3676, 4.9041),
    city!(["stockholm", "стокгольм"], Europe::Stockholm, 59.3293, 18.0686),
    city!(["malmo", "malmö"], Europe::Stockholm, 55.6050, 13.0038),
    city!(["helsinki", "хельсинки"], Europe::Helsinki, 60.1699, 24.9384),
    city!(["athens", "афины"], Europe::Athens, 37.9838, 23.7275),
    city!(["reykjavik", "reykjavík"], Atlantic::Reykjavik, 64.1466, -21.9426),
    city!(["dubai", "дубай"], Asia::Dubai, 25.2048, 55.2708),
    city!(["tel aviv", "тель-авив"], Asia::Jerusalem, 32.0853, 34.7818),
    city!(["delhi", "new delhi", "дели"], Asia::Kolkata, 28.6139, 77.2090),
    city!(["beijing", "пекин"], Asia::Shanghai, 39.9042, 116.4074),
    city!(["shanghai", "шанхай"], Asia::Shanghai, 31.2304, 121.4737),
    city!(["tokyo", "токио"], Asia::Tokyo, 35.6762, 139.6503),
    city!(["seoul", "сеул"], Asia::Seoul, 37.5665, 126.9780),
    city!(["bangkok", "бангкок"], Asia::Bangkok, 13.7563, 100.5018),
    city!(["singapore", "сингапур"], Asia::Singapore, 1.3521, 103.8198),
    city!(["sydney", "сидней"], Australia::Sydney, -33.8688, 151.2093),
    city!(["new york", "nyc", "нью-йорк"], America::New_York, 40.7128, -74.0060),
    city!(["chicago", "чикаго"], America::Chicago, 41.8781, -87.6298),
    city!(["denver"], America::Denver, 39.7392, -104.9903),
    city!(["los angeles", "лос-анджелес"], America::Los_Angeles, 34.0522, -118.2437),
    city!(["toronto", "торонто"], America::Toronto, 43.6532, -79.3832),
    city!(["montreal", "montréal"], America::Toronto, 45.5017, -73.5673),
    city!(
        ["mexico city", "ciudad de méxico", "méxico"],
        America::Mexico_City,
        19.4326,
        -99.1332
    ),
    city!(["bogota", "bogotá"], America::Bogota, 4.7110, -74.0721),
    city!(["sao paulo", "são paulo"], America::Sao_Paulo, -23.5505, -46.6333),
    city!(["buenos aires"], America::Argentina::Buenos_Aires, -34.6037, -58.3816),
    city!(["cairo", "каир"], Africa::Cairo, 30.0444, 31.2357),
    city!(["lagos"], Africa::Lagos, 6.5244, 3.3792),
    city!(["johannesburg"], Africa::Johannesburg, -26.2041, 28.0473),
];

/// Lowercases, strips diacritics and collapses separators so that
/// `"Zürich"`, `"zurich"` and `" ZURICH "` compare equal.
fn normalize_name(text: &str) -> String {
    let folded = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '.' || c == ',')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves free text into a timezone. A canonical zone identifier is
/// accepted as is (case-insensitive), otherwise the text is looked up in the
/// table of city aliases.
pub fn resolve_timezone(text: &str) -> Option<Tz> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(tz) = text.parse::<Tz>() {
        return Some(tz);
    }
    if let Some(tz) = TZ_VARIANTS
        .iter()
        .find(|tz| tz.name().eq_ignore_ascii_case(text))
    {
        return Some(*tz);
    }

    let needle = normalize_name(text);
    CITIES
        .iter()
        .find(|city| city.names.iter().any(|name| normalize_name(name) == needle))
        .map(|city| city.tz)
}

fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lat2) = (lat1.to_radians(), lat2.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn valid_coordinates(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Zone boundaries, loaded on first use
static BOUNDARIES: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

fn closest_city(lat: f64, lon: f64) -> Option<Tz> {
    let (closest, distance) = CITIES
        .iter()
        .map(|city| (city, distance_km(lat, lon, city.lat, city.lon)))
        .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))?;

    (distance <= CLOSEST_MATCH_MAX_KM).then(|| closest.tz)
}

/// Looks up the zone whose boundary contains the coordinate. Falls back to
/// the closest known city when the boundary data has no usable answer.
pub fn timezone_from_coordinates(lat: f64, lon: f64) -> Option<Tz> {
    if !valid_coordinates(lat, lon) {
        return None;
    }

    match BOUNDARIES.get_tz_name(lon, lat).parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => closest_city(lat, lon),
    }
}

/// Maps a wall clock time in `tz` to an absolute instant. Uses the offset in
/// effect at that local time. Ambiguous times (clocks turned back) resolve to
/// the earliest instant and times inside a gap (clocks turned forward) are
/// pushed past the gap.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    for shift_minutes in [0, 30, 60, 120] {
        let candidate = naive + Duration::minutes(shift_minutes);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    tz.from_utc_datetime(&naive).with_timezone(&Utc)
}

/// Combines a time of day and a date in the zone named `zone_id`
pub fn combine_local_time(
    zone_id: &str,
    time_of_day: NaiveTime,
    date: NaiveDate,
) -> Option<DateTime<Utc>> {
    let tz = zone_id.parse::<Tz>().ok()?;
    Some(localize(&tz, date.and_time(time_of_day)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_accepts_canonical_zone_ids() {
        assert_eq!(resolve_timezone("Europe/Moscow"), Some(Europe::Moscow));
        assert_eq!(resolve_timezone("  UTC "), Some(chrono_tz::UTC));
        assert_eq!(resolve_timezone("europe/moscow"), Some(Europe::Moscow));
    }

    #[test]
    fn it_resolves_city_aliases() {
        assert_eq!(resolve_timezone("Tomsk"), Some(Asia::Tomsk));
        assert_eq!(resolve_timezone("TOMSK"), Some(Asia::Tomsk));
        assert_eq!(resolve_timezone("томск"), Some(Asia::Tomsk));
        assert_eq!(resolve_timezone("Санкт-Петербург"), Some(Europe::Moscow));
        assert_eq!(resolve_timezone("Zurich"), Some(Europe::Zurich));
        assert_eq!(resolve_timezone("zürich"), Some(Europe::Zurich));
        assert_eq!(resolve_timezone("Sao-Paulo"), Some(America::Sao_Paulo));
    }

    #[test]
    fn it_rejects_unknown_places() {
        assert_eq!(resolve_timezone("Nowhereistan"), None);
        assert_eq!(resolve_timezone(""), None);
        assert_eq!(resolve_timezone("   "), None);
    }

    #[test]
    fn it_resolves_coordinates() {
        // Red square
        assert_eq!(timezone_from_coordinates(55.7539, 37.6208), Some(Europe::Moscow));
        // Taiga north east of Tomsk
        assert_eq!(timezone_from_coordinates(57.5, 86.0), Some(Asia::Tomsk));
        assert_eq!(timezone_from_coordinates(91.0, 0.0), None);
        assert_eq!(timezone_from_coordinates(f64::NAN, 0.0), None);
    }

    #[test]
    fn coordinates_resolve_by_zone_boundaries() {
        // Arizona keeps standard time all year unlike its neighbours
        assert_eq!(
            timezone_from_coordinates(33.4484, -112.0740),
            Some(America::Phoenix)
        );
        // Squeezed in between Poland and Lithuania
        assert_eq!(
            timezone_from_coordinates(54.7104, 20.4522),
            Some(Europe::Kaliningrad)
        );
        // Far away from every city with an alias
        assert_eq!(
            timezone_from_coordinates(-31.9505, 115.8605),
            Some(Australia::Perth)
        );
        assert_eq!(
            timezone_from_coordinates(21.3069, -157.8583),
            Some(chrono_tz::Pacific::Honolulu)
        );
        assert_eq!(
            timezone_from_coordinates(-1.2921, 36.8219),
            Some(Africa::Nairobi)
        );
    }

    #[test]
    fn combine_local_time_uses_offset_of_that_date() {
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let winter = combine_local_time("Europe/Berlin", time, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .unwrap();
        let summer = combine_local_time("Europe/Berlin", time, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap())
            .unwrap();
        assert_eq!(winter.hour(), 8);
        assert_eq!(summer.hour(), 7);
        assert!(combine_local_time("Mars/Olympus", time, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()).is_none());
    }

    #[test]
    fn localize_skips_over_dst_gaps() {
        // 02:30 does not exist in Berlin on 2024-03-31
        let naive = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let dt = localize(&Europe::Berlin, naive);
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 31, 1, 0, 0).unwrap());
    }
}
