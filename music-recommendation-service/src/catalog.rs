use serde::{Deserialize, Serialize};

use crate::error::RecommendationError;

/// One recommendable song. Identified only by its position in its genre list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub creator: String,
    pub title: String,
    /// Album the song appears on; empty for works without one
    pub collection: String,
    pub image_url: String,
}

impl Item {
    pub fn new(
        creator: impl Into<String>,
        title: impl Into<String>,
        collection: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            creator: creator.into(),
            title: title.into(),
            collection: collection.into(),
            image_url: image_url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub key: String,
    pub items: Vec<Item>,
}

/// Immutable genre → items mapping, built once at startup and shared by reference.
/// Genre order is preserved; it is the order choices are offered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    genres: Vec<Genre>,
}

impl Catalog {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self { genres }
    }

    /// Every genre must have at least one item
    pub fn validate(&self) -> Result<(), RecommendationError> {
        match self.genres.iter().find(|g| g.items.is_empty()) {
            Some(genre) => Err(RecommendationError::CatalogIntegrity(genre.key.clone())),
            None => Ok(()),
        }
    }

    pub fn genre_keys(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.key.as_str()).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items(key).is_some()
    }

    pub fn items(&self, key: &str) -> Option<&[Item]> {
        self.genres
            .iter()
            .find(|g| g.key == key)
            .map(|g| g.items.as_slice())
    }

    /// The six genres the bot ships with, three songs each
    pub fn builtin() -> Self {
        let genre = |key: &str, items: Vec<Item>| Genre {
            key: key.to_string(),
            items,
        };

        Self::new(vec![
            genre(
                "rock",
                vec![
                    Item::new(
                        "Tame Impala",
                        "Lucidity",
                        "Innerspeaker",
                        "https://upload.wikimedia.org/wikipedia/en/d/dc/Tame_Impala_-_Innerspeaker.png",
                    ),
                    Item::new(
                        "King Gizzard and the Lizard Wizard",
                        "Rattlesnake",
                        "Flying Microtonal Banana",
                        "https://img.discogs.com/Dsx2WfNSZ0G3SWPY9wduXsKblqs=/fit-in/300x300/filters:strip_icc():format(jpeg):mode_rgb():quality(40)/discogs-images/R-9885063-1488706851-7952.jpeg.jpg",
                    ),
                    Item::new(
                        "Temples",
                        "Sun Structures",
                        "Sun Structures",
                        "https://upload.wikimedia.org/wikipedia/en/5/58/Temples_-_Sun_Structures.png",
                    ),
                ],
            ),
            genre(
                "metal",
                vec![
                    Item::new(
                        "Megadeth",
                        "Lucretia",
                        "Rust in Peace",
                        "https://upload.wikimedia.org/wikipedia/en/d/dc/Megadeth-RustInPeace.jpg",
                    ),
                    Item::new(
                        "Annihilator",
                        "Alison Hell",
                        "Alice in Hell",
                        "https://upload.wikimedia.org/wikipedia/en/thumb/3/3a/AnnihilatorAliceInHell.jpg/220px-AnnihilatorAliceInHell.jpg",
                    ),
                    Item::new(
                        "Metallica",
                        "One",
                        "...And Justice for All",
                        "https://upload.wikimedia.org/wikipedia/en/b/bd/Metallica_-_...And_Justice_for_All_cover.jpg",
                    ),
                ],
            ),
            genre(
                "classical",
                vec![
                    Item::new(
                        "Chopin",
                        "Etude Op.10 No.3 in E Major",
                        "",
                        "https://m.media-amazon.com/images/I/71DCffFhbYL._SS500_.jpg",
                    ),
                    Item::new(
                        "Antonio Vivaldi",
                        "Four Seasons",
                        "",
                        "https://www.baroquemusic.org/19Large.jpg",
                    ),
                    Item::new(
                        "Camille Saint-Saëns",
                        "Danse Macabre",
                        "",
                        "https://images-na.ssl-images-amazon.com/images/I/71C2-Lw5wUL._SX355_.jpg",
                    ),
                ],
            ),
            genre(
                "jazz",
                vec![
                    Item::new(
                        "McCoy Tyner",
                        "When Sunny Gets Blue",
                        "Today and Tomorrow",
                        "https://upload.wikimedia.org/wikipedia/en/e/ec/Today_and_Tomorrow.jpg",
                    ),
                    Item::new(
                        "Beegie Adair",
                        "What A Difference A Day Makes",
                        "A Time For Love: Jazz Piano Romance",
                        "https://images-na.ssl-images-amazon.com/images/I/711WxGESziL._SX355_.jpg",
                    ),
                    Item::new(
                        "Jack Jezzro",
                        "Wave",
                        "Cocktail Party Bossa Nova",
                        "https://images-na.ssl-images-amazon.com/images/I/81GP9iBusPL._SY355_.jpg",
                    ),
                ],
            ),
            genre(
                "pop",
                vec![
                    Item::new(
                        "Michelle Branch",
                        "Game of Love",
                        "Shaman",
                        "https://upload.wikimedia.org/wikipedia/en/b/b2/Santana_-_Shaman_-_CD_album_cover.jpg",
                    ),
                    Item::new(
                        "Khriz y Angel",
                        "Ven Bailalo",
                        "Ven Bailalo (Reggaeton Mix)",
                        "https://m.media-amazon.com/images/I/61YsVHHg-NL._SS500_.jpg",
                    ),
                    Item::new(
                        "Foster the People",
                        "Helena Beat",
                        "Torches",
                        "https://upload.wikimedia.org/wikipedia/en/d/d3/Torches_foster_the_people.jpg",
                    ),
                ],
            ),
            genre(
                "electronic",
                vec![
                    Item::new(
                        "Linea Aspera",
                        "Synapse",
                        "Linea Aspera",
                        "https://img.discogs.com/XDDumr9vpZBh1lcBmxx6BB8yetM=/fit-in/600x600/filters:strip_icc():format(jpeg):mode_rgb():quality(90)/discogs-images/R-3831443-1346116401-7418.jpeg.jpg",
                    ),
                    Item::new(
                        "New Order",
                        "Blue Monday",
                        "Substance",
                        "https://images-na.ssl-images-amazon.com/images/I/31RRJ84EK6L.jpg",
                    ),
                    Item::new(
                        "Kraftwerk",
                        "Numbers",
                        "Computer World",
                        "https://upload.wikimedia.org/wikipedia/en/a/a6/Kraftwerk_-_Computer_World.png",
                    ),
                ],
            ),
        ])
    }
}
