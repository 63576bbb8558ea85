// ============================================================================
// TRIP RECORD - Respuesta de /api/app/scanQrCode
// ============================================================================
// Forma canónica: { camion, trajet, pieces, chauffeur }.
// Forma antigua (deprecada): datos del chófer dentro de `trajet`
// (chauffeur_nom, chauffeur_prenom, ...) y `quantite` en las piezas.
// Se acepta y se normaliza a la canónica con un warning en el log.
// ============================================================================

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "num_carte_grise")]
    pub registration_number: String,
    #[serde(rename = "num_ctrl_tech")]
    pub inspection_reference: String,
    #[serde(rename = "date_ctrl_tech")]
    pub inspection_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(rename = "depart")]
    pub origin_label: String,
    #[serde(rename = "destination")]
    pub destination_label: String,
    #[serde(rename = "date_heure_depart")]
    pub departure_at: String,
    #[serde(rename = "date_heure_arrivee_prevue")]
    pub estimated_arrival_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "prenom")]
    pub surname: String,
    #[serde(rename = "numero_permis")]
    pub license_number: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.surname, self.name).trim().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CargoItem {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "num_ref")]
    pub reference: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "categorie")]
    pub category: Option<String>,
    #[serde(default, rename = "sous_categorie")]
    pub subcategory: Option<String>,
    #[serde(default, rename = "materiau")]
    pub material: Option<String>,
    #[serde(default, rename = "dimension")]
    pub dimensions: Option<String>,
    #[serde(default, rename = "couleur")]
    pub color: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default, rename = "poids")]
    pub weight_kg: Option<f64>,
    #[serde(default, rename = "origine")]
    pub origin: Option<String>,
    #[serde(default, rename = "etat")]
    pub condition: Option<String>,
    #[serde(default, rename = "qualite")]
    pub quality: Option<String>,
    pub quantity: u32,
}

/// Datos de un camión escaneado. Cada fetch lo reemplaza entero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "camion")]
    pub vehicle: Option<Vehicle>,
    #[serde(rename = "trajet")]
    pub trip: Option<Trip>,
    #[serde(rename = "pieces")]
    pub cargo: Vec<CargoItem>,
    #[serde(rename = "chauffeur")]
    pub driver: Option<Driver>,
}

/// Error de parseo del cuerpo 2xx
#[derive(Debug, thiserror::Error)]
pub enum TripParseError {
    #[error("invalid trip payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cargo item {index} has no quantity")]
    MissingQuantity { index: usize },
}

impl TripRecord {
    /// Parsea la respuesta del backend aceptando la forma canónica y la antigua
    pub fn parse(body: &str) -> Result<Self, TripParseError> {
        let wire: TripRecordWire = serde_json::from_str(body)?;
        wire.normalize()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle.is_none() && self.trip.is_none() && self.cargo.is_empty() && self.driver.is_none()
    }
}

// --- Forma de cable (incluye los campos deprecados) -------------------------

#[derive(Deserialize)]
struct TripRecordWire {
    #[serde(default)]
    camion: Option<Vehicle>,
    #[serde(default)]
    trajet: Option<TripWire>,
    #[serde(default)]
    pieces: Option<Vec<CargoItemWire>>,
    #[serde(default)]
    chauffeur: Option<Driver>,
}

#[derive(Deserialize)]
struct TripWire {
    #[serde(flatten)]
    trip: Trip,
    #[serde(default)]
    chauffeur_nom: Option<String>,
    #[serde(default)]
    chauffeur_prenom: Option<String>,
    #[serde(default)]
    chauffeur_numero_permis: Option<String>,
    #[serde(default)]
    chauffeur_photo_url: Option<String>,
}

impl TripWire {
    fn legacy_driver(&self) -> Option<Driver> {
        let name = self.chauffeur_nom.clone()?;
        Some(Driver {
            name,
            surname: self.chauffeur_prenom.clone().unwrap_or_default(),
            license_number: self.chauffeur_numero_permis.clone().unwrap_or_default(),
            photo_url: self.chauffeur_photo_url.clone(),
        })
    }
}

#[derive(Deserialize)]
struct CargoItemWire {
    #[serde(flatten)]
    fields: CargoFields,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    quantite: Option<u32>,
}

// CargoItem sin la cantidad, para poder leer `quantity` o `quantite`
#[derive(Deserialize)]
struct CargoFields {
    nom: String,
    num_ref: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    categorie: Option<String>,
    #[serde(default)]
    sous_categorie: Option<String>,
    #[serde(default)]
    materiau: Option<String>,
    #[serde(default)]
    dimension: Option<String>,
    #[serde(default)]
    couleur: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    poids: Option<f64>,
    #[serde(default)]
    origine: Option<String>,
    #[serde(default)]
    etat: Option<String>,
    #[serde(default)]
    qualite: Option<String>,
}

impl TripRecordWire {
    fn normalize(self) -> Result<TripRecord, TripParseError> {
        let mut driver = self.chauffeur;

        let trip = match self.trajet {
            Some(wire) => {
                if let Some(legacy) = wire.legacy_driver() {
                    if driver.is_none() {
                        log::warn!("⚠️ [TRIP] Chófer dentro de 'trajet' (formato deprecado), normalizando");
                        driver = Some(legacy);
                    } else {
                        log::warn!("⚠️ [TRIP] Chófer duplicado en 'trajet' y 'chauffeur', se usa 'chauffeur'");
                    }
                }
                Some(wire.trip)
            }
            None => None,
        };

        let mut cargo = Vec::new();
        for (index, item) in self.pieces.unwrap_or_default().into_iter().enumerate() {
            let quantity = match (item.quantity, item.quantite) {
                (Some(q), _) => q,
                (None, Some(q)) => {
                    log::warn!("⚠️ [TRIP] Pieza {} usa 'quantite' (formato deprecado)", index);
                    q
                }
                (None, None) => return Err(TripParseError::MissingQuantity { index }),
            };
            let f = item.fields;
            cargo.push(CargoItem {
                name: f.nom,
                reference: f.num_ref,
                description: f.description,
                category: f.categorie,
                subcategory: f.sous_categorie,
                material: f.materiau,
                dimensions: f.dimension,
                color: f.couleur,
                photo_url: f.photo_url,
                weight_kg: f.poids,
                origin: f.origine,
                condition: f.etat,
                quality: f.qualite,
                quantity,
            });
        }

        Ok(TripRecord {
            vehicle: self.camion,
            trip,
            cargo,
            driver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = r#"{
        "camion": {"num_carte_grise": "AB-123-CD", "num_ctrl_tech": "CT-998", "date_ctrl_tech": "2024-05-02"},
        "trajet": {"depart": "Lyon", "destination": "Marseille",
                   "date_heure_depart": "2024-06-01T08:30:00Z",
                   "date_heure_arrivee_prevue": "2024-06-01T12:00:00Z"},
        "pieces": [
            {"nom": "Palette", "num_ref": "P-1", "categorie": "Bois", "poids": 22.5, "quantity": 4},
            {"nom": "Caisse", "num_ref": "C-7", "quantity": 1}
        ],
        "chauffeur": {"nom": "Martin", "prenom": "Luc", "numero_permis": "PERM-42", "photo_url": "https://cdn/x.jpg"}
    }"#;

    #[test]
    fn parses_canonical_shape() {
        let record = TripRecord::parse(CANONICAL).unwrap();
        assert_eq!(record.vehicle.as_ref().unwrap().registration_number, "AB-123-CD");
        assert_eq!(record.trip.as_ref().unwrap().destination_label, "Marseille");
        assert_eq!(record.cargo.len(), 2);
        assert_eq!(record.cargo[0].weight_kg, Some(22.5));
        assert_eq!(record.cargo[0].category.as_deref(), Some("Bois"));
        assert_eq!(record.driver.as_ref().unwrap().full_name(), "Luc Martin");
    }

    #[test]
    fn normalizes_driver_embedded_in_trip() {
        let body = r#"{
            "trajet": {"depart": "Lille", "destination": "Paris",
                       "date_heure_depart": "2024-06-01T08:30", "date_heure_arrivee_prevue": "2024-06-01T10:30",
                       "chauffeur_nom": "Durand", "chauffeur_numero_permis": "P-9"},
            "pieces": [{"nom": "Tube", "num_ref": "T-1", "quantite": 3}]
        }"#;
        let record = TripRecord::parse(body).unwrap();
        let driver = record.driver.unwrap();
        assert_eq!(driver.name, "Durand");
        assert_eq!(driver.license_number, "P-9");
        assert_eq!(driver.surname, "");
        assert_eq!(record.cargo[0].quantity, 3);
        assert!(record.vehicle.is_none());
    }

    #[test]
    fn separate_driver_entity_wins_over_legacy_fields() {
        let body = r#"{
            "trajet": {"depart": "A", "destination": "B",
                       "date_heure_depart": "x", "date_heure_arrivee_prevue": "y",
                       "chauffeur_nom": "Ancien"},
            "chauffeur": {"nom": "Nouveau", "prenom": "N", "numero_permis": "P"}
        }"#;
        let record = TripRecord::parse(body).unwrap();
        assert_eq!(record.driver.unwrap().name, "Nouveau");
    }

    #[test]
    fn missing_quantity_is_rejected() {
        let body = r#"{"pieces": [{"nom": "Tube", "num_ref": "T-1"}]}"#;
        assert!(matches!(
            TripRecord::parse(body),
            Err(TripParseError::MissingQuantity { index: 0 })
        ));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        assert!(TripRecord::parse("<html>oops</html>").is_err());
        assert!(TripRecord::parse("null").is_err());
        assert!(TripRecord::parse(r#"{"pieces": "none"}"#).is_err());
    }

    #[test]
    fn empty_object_is_an_empty_record() {
        let record = TripRecord::parse("{}").unwrap();
        assert!(record.is_empty());
    }
}
