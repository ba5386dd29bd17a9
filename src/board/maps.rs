//! Built-in boards for each variant.

use super::color::Color::{self, Black, Blue, Purple, Red, Yellow};
use super::map::{Board, BoardBuilder};
use crate::core::ConfigError;

fn build(cities: &[(&str, Color, bool)], edges: &[(&str, &str)]) -> BoardBuilder {
    let mut builder = BoardBuilder::new();
    for &(name, color, port) in cities {
        builder = if port {
            builder.port(name, color)
        } else {
            builder.city(name, color)
        };
    }
    for &(a, b) in edges {
        builder = builder.connect(a, b);
    }
    builder
}

const CLASSIC_CITIES: &[(&str, Color, bool)] = &[
    ("Atlanta", Blue, false),
    ("Chicago", Blue, false),
    ("Essen", Blue, false),
    ("London", Blue, true),
    ("Madrid", Blue, true),
    ("Milan", Blue, false),
    ("Montreal", Blue, false),
    ("New York", Blue, true),
    ("Paris", Blue, false),
    ("San Francisco", Blue, true),
    ("St. Petersburg", Blue, true),
    ("Washington", Blue, true),
    ("Bogota", Yellow, false),
    ("Buenos Aires", Yellow, true),
    ("Johannesburg", Yellow, true),
    ("Khartoum", Yellow, false),
    ("Kinshasa", Yellow, false),
    ("Lagos", Yellow, true),
    ("Lima", Yellow, true),
    ("Los Angeles", Yellow, true),
    ("Mexico City", Yellow, false),
    ("Miami", Yellow, true),
    ("Santiago", Yellow, true),
    ("Sao Paulo", Yellow, true),
    ("Algiers", Black, true),
    ("Baghdad", Black, false),
    ("Cairo", Black, true),
    ("Chennai", Black, true),
    ("Delhi", Black, false),
    ("Istanbul", Black, true),
    ("Karachi", Black, true),
    ("Kolkata", Black, true),
    ("Moscow", Black, false),
    ("Mumbai", Black, true),
    ("Riyadh", Black, false),
    ("Tehran", Black, false),
    ("Bangkok", Red, true),
    ("Beijing", Red, false),
    ("Ho Chi Minh City", Red, true),
    ("Hong Kong", Red, true),
    ("Jakarta", Red, true),
    ("Manila", Red, true),
    ("Osaka", Red, true),
    ("Seoul", Red, true),
    ("Shanghai", Red, true),
    ("Sydney", Red, true),
    ("Taipei", Red, true),
    ("Tokyo", Red, true),
];

const CLASSIC_EDGES: &[(&str, &str)] = &[
    ("Atlanta", "Chicago"),
    ("Atlanta", "Washington"),
    ("Atlanta", "Miami"),
    ("Chicago", "San Francisco"),
    ("Chicago", "Los Angeles"),
    ("Chicago", "Mexico City"),
    ("Chicago", "Montreal"),
    ("Montreal", "New York"),
    ("Montreal", "Washington"),
    ("New York", "Washington"),
    ("New York", "London"),
    ("New York", "Madrid"),
    ("Washington", "Miami"),
    ("San Francisco", "Tokyo"),
    ("San Francisco", "Manila"),
    ("San Francisco", "Los Angeles"),
    ("London", "Madrid"),
    ("London", "Paris"),
    ("London", "Essen"),
    ("Madrid", "Paris"),
    ("Madrid", "Algiers"),
    ("Madrid", "Sao Paulo"),
    ("Paris", "Essen"),
    ("Paris", "Milan"),
    ("Paris", "Algiers"),
    ("Essen", "Milan"),
    ("Essen", "St. Petersburg"),
    ("Milan", "Istanbul"),
    ("St. Petersburg", "Istanbul"),
    ("St. Petersburg", "Moscow"),
    ("Los Angeles", "Mexico City"),
    ("Los Angeles", "Sydney"),
    ("Mexico City", "Miami"),
    ("Mexico City", "Bogota"),
    ("Mexico City", "Lima"),
    ("Miami", "Bogota"),
    ("Bogota", "Lima"),
    ("Bogota", "Buenos Aires"),
    ("Bogota", "Sao Paulo"),
    ("Lima", "Santiago"),
    ("Buenos Aires", "Sao Paulo"),
    ("Sao Paulo", "Lagos"),
    ("Lagos", "Khartoum"),
    ("Lagos", "Kinshasa"),
    ("Kinshasa", "Khartoum"),
    ("Kinshasa", "Johannesburg"),
    ("Johannesburg", "Khartoum"),
    ("Khartoum", "Cairo"),
    ("Algiers", "Istanbul"),
    ("Algiers", "Cairo"),
    ("Istanbul", "Moscow"),
    ("Istanbul", "Baghdad"),
    ("Istanbul", "Cairo"),
    ("Moscow", "Tehran"),
    ("Cairo", "Baghdad"),
    ("Cairo", "Riyadh"),
    ("Baghdad", "Riyadh"),
    ("Baghdad", "Karachi"),
    ("Baghdad", "Tehran"),
    ("Tehran", "Karachi"),
    ("Tehran", "Delhi"),
    ("Riyadh", "Karachi"),
    ("Karachi", "Delhi"),
    ("Karachi", "Mumbai"),
    ("Delhi", "Mumbai"),
    ("Delhi", "Chennai"),
    ("Delhi", "Kolkata"),
    ("Mumbai", "Chennai"),
    ("Chennai", "Kolkata"),
    ("Chennai", "Bangkok"),
    ("Chennai", "Jakarta"),
    ("Kolkata", "Bangkok"),
    ("Kolkata", "Hong Kong"),
    ("Bangkok", "Jakarta"),
    ("Bangkok", "Ho Chi Minh City"),
    ("Bangkok", "Hong Kong"),
    ("Jakarta", "Ho Chi Minh City"),
    ("Jakarta", "Sydney"),
    ("Ho Chi Minh City", "Hong Kong"),
    ("Ho Chi Minh City", "Manila"),
    ("Hong Kong", "Shanghai"),
    ("Hong Kong", "Taipei"),
    ("Hong Kong", "Manila"),
    ("Shanghai", "Beijing"),
    ("Shanghai", "Seoul"),
    ("Shanghai", "Tokyo"),
    ("Shanghai", "Taipei"),
    ("Beijing", "Seoul"),
    ("Seoul", "Tokyo"),
    ("Tokyo", "Osaka"),
    ("Osaka", "Taipei"),
    ("Taipei", "Manila"),
    ("Manila", "Sydney"),
];

const ROME_CITIES: &[(&str, Color, bool)] = &[
    ("Eburacum", Blue, false),
    ("Londinium", Blue, true),
    ("Gesoriacum", Blue, true),
    ("Treveri", Blue, false),
    ("Tarraco", Yellow, true),
    ("Carthago Nova", Yellow, true),
    ("Gades", Yellow, true),
    ("Carthago", Yellow, true),
    ("Aquileia", Black, true),
    ("Sirmium", Black, false),
    ("Thessalonica", Black, true),
    ("Constantinopolis", Black, true),
    ("Roma", Red, true),
    ("Ravenna", Red, true),
    ("Mediolanum", Red, false),
    ("Neapolis", Red, true),
    ("Lugdunum", Purple, false),
    ("Burdigala", Purple, true),
    ("Narbo", Purple, true),
    ("Massilia", Purple, true),
];

const ROME_EDGES: &[(&str, &str)] = &[
    ("Eburacum", "Londinium"),
    ("Londinium", "Gesoriacum"),
    ("Gesoriacum", "Treveri"),
    ("Gesoriacum", "Lugdunum"),
    ("Treveri", "Lugdunum"),
    ("Treveri", "Mediolanum"),
    ("Lugdunum", "Burdigala"),
    ("Lugdunum", "Narbo"),
    ("Lugdunum", "Massilia"),
    ("Lugdunum", "Mediolanum"),
    ("Burdigala", "Narbo"),
    ("Burdigala", "Tarraco"),
    ("Narbo", "Massilia"),
    ("Narbo", "Tarraco"),
    ("Massilia", "Mediolanum"),
    ("Massilia", "Roma"),
    ("Tarraco", "Carthago Nova"),
    ("Carthago Nova", "Gades"),
    ("Carthago Nova", "Carthago"),
    ("Gades", "Carthago"),
    ("Carthago", "Roma"),
    ("Carthago", "Neapolis"),
    ("Mediolanum", "Ravenna"),
    ("Mediolanum", "Aquileia"),
    ("Ravenna", "Roma"),
    ("Ravenna", "Aquileia"),
    ("Roma", "Neapolis"),
    ("Aquileia", "Sirmium"),
    ("Sirmium", "Thessalonica"),
    ("Sirmium", "Constantinopolis"),
    ("Thessalonica", "Constantinopolis"),
    ("Neapolis", "Thessalonica"),
];

const IBERIA_CITIES: &[(&str, Color, bool)] = &[
    ("A Coruna", Blue, true),
    ("Oviedo", Blue, false),
    ("Santander", Blue, true),
    ("Bilbao", Blue, true),
    ("Pamplona", Blue, false),
    ("Porto", Black, true),
    ("Coimbra", Black, false),
    ("Lisboa", Black, true),
    ("Salamanca", Black, false),
    ("Badajoz", Black, false),
    ("Sevilla", Yellow, false),
    ("Cadiz", Yellow, true),
    ("Cordoba", Yellow, false),
    ("Granada", Yellow, false),
    ("Almeria", Yellow, true),
    ("Madrid", Red, false),
    ("Zaragoza", Red, false),
    ("Barcelona", Red, true),
    ("Valencia", Red, true),
    ("Murcia", Red, true),
];

const IBERIA_EDGES: &[(&str, &str)] = &[
    ("A Coruna", "Oviedo"),
    ("A Coruna", "Porto"),
    ("Oviedo", "Santander"),
    ("Oviedo", "Salamanca"),
    ("Santander", "Bilbao"),
    ("Santander", "Madrid"),
    ("Bilbao", "Pamplona"),
    ("Pamplona", "Zaragoza"),
    ("Zaragoza", "Barcelona"),
    ("Zaragoza", "Madrid"),
    ("Zaragoza", "Valencia"),
    ("Barcelona", "Valencia"),
    ("Valencia", "Murcia"),
    ("Valencia", "Madrid"),
    ("Murcia", "Almeria"),
    ("Murcia", "Granada"),
    ("Madrid", "Salamanca"),
    ("Madrid", "Cordoba"),
    ("Madrid", "Badajoz"),
    ("Salamanca", "Porto"),
    ("Salamanca", "Coimbra"),
    ("Porto", "Coimbra"),
    ("Coimbra", "Lisboa"),
    ("Lisboa", "Badajoz"),
    ("Badajoz", "Sevilla"),
    ("Badajoz", "Cordoba"),
    ("Sevilla", "Cadiz"),
    ("Sevilla", "Cordoba"),
    ("Cordoba", "Granada"),
    ("Granada", "Almeria"),
];

impl Board {
    /// The 48-city world map.
    pub fn classic() -> Result<Board, ConfigError> {
        build(CLASSIC_CITIES, CLASSIC_EDGES).start("Atlanta").build()
    }

    /// The late-empire Mediterranean. Roma is the capital and starting city.
    pub fn rome() -> Result<Board, ConfigError> {
        build(ROME_CITIES, ROME_EDGES)
            .capital("Roma")
            .start("Roma")
            .build()
    }

    /// The peninsula. Players choose their own starting cities.
    pub fn iberia() -> Result<Board, ConfigError> {
        build(IBERIA_CITIES, IBERIA_EDGES).start("Madrid").build()
    }
}
