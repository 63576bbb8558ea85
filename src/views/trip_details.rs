// ============================================================================
// TRIP DETAILS VIEW - Camion / Trajet / Pièces / Chauffeur
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::ElementBuilder;
use crate::models::trip::{CargoItem, Driver, Trip, TripRecord, Vehicle};
use crate::utils::format::{format_date, format_datetime};

type Field = (&'static str, String);

pub fn vehicle_fields(vehicle: &Vehicle) -> Vec<Field> {
    vec![
        ("Numéro Carte Grise", vehicle.registration_number.clone()),
        ("Numéro Contrôle Technique", vehicle.inspection_reference.clone()),
        ("Date Contrôle Technique", format_date(&vehicle.inspection_date)),
    ]
}

pub fn trip_fields(trip: &Trip) -> Vec<Field> {
    vec![
        ("Départ", trip.origin_label.clone()),
        ("Destination", trip.destination_label.clone()),
        ("Date et Heure de Départ", format_datetime(&trip.departure_at)),
        ("Date et Heure d'Arrivée Prévue", format_datetime(&trip.estimated_arrival_at)),
    ]
}

/// Campos de una pieza; los opcionales ausentes no se muestran
pub fn cargo_fields(item: &CargoItem) -> Vec<Field> {
    let mut fields = vec![
        ("Nom", item.name.clone()),
        ("Référence", item.reference.clone()),
    ];
    let optional = [
        ("Description", &item.description),
        ("Catégorie", &item.category),
        ("Sous-Catégorie", &item.subcategory),
        ("Matériau", &item.material),
        ("Dimensions", &item.dimensions),
        ("Couleur", &item.color),
        ("Origine", &item.origin),
        ("État", &item.condition),
        ("Qualité", &item.quality),
    ];
    fields.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.clone().map(|v| (label, v))),
    );
    if let Some(weight) = item.weight_kg {
        fields.push(("Poids", format!("{} kg", weight)));
    }
    fields.push(("Quantité", item.quantity.to_string()));
    fields
}

pub fn driver_fields(driver: &Driver) -> Vec<Field> {
    vec![
        ("Nom", driver.name.clone()),
        ("Prénom", driver.surname.clone()),
        ("Numéro de Permis", driver.license_number.clone()),
    ]
}

fn render_fields(fields: Vec<Field>) -> Result<Element, JsValue> {
    let rows = fields
        .into_iter()
        .map(|(label, value)| -> Result<Element, JsValue> {
            let strong = ElementBuilder::new("strong")?.text(&format!("{}:", label)).build();
            let value = ElementBuilder::new("span")?.text(&format!(" {}", value)).build();
            Ok(ElementBuilder::new("p")?.child(strong)?.child(value)?.build())
        })
        .collect::<Result<Vec<_>, JsValue>>()?;

    Ok(ElementBuilder::new("div")?.class("detail-card").children(rows)?.build())
}

fn render_section(title: &str, body: Element) -> Result<Element, JsValue> {
    let heading = ElementBuilder::new("h3")?.text(title).build();
    Ok(ElementBuilder::new("section")?
        .class("detail-section")
        .child(heading)?
        .child(body)?
        .build())
}

fn render_photo(url: &str, alt: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("img")?
        .class("detail-photo")
        .attr("src", url)?
        .attr("alt", alt)?
        .build())
}

/// Renderizar los datos del backend. Las entidades ausentes se omiten.
pub fn render_trip_record(record: &TripRecord) -> Result<Element, JsValue> {
    let container = ElementBuilder::new("div")?.class("backend-data").build();
    container.append_child(&ElementBuilder::new("h2")?.text("Backend Data").build())?;

    if record.is_empty() {
        let empty = ElementBuilder::new("p")?
            .class("detail-empty")
            .text("Aucune donnée pour ce code.")
            .build();
        container.append_child(&empty)?;
        return Ok(container);
    }

    if let Some(vehicle) = &record.vehicle {
        let section = render_section("Camion", render_fields(vehicle_fields(vehicle))?)?;
        container.append_child(&section)?;
    }

    if let Some(trip) = &record.trip {
        let section = render_section("Trajet", render_fields(trip_fields(trip))?)?;
        container.append_child(&section)?;
    }

    if !record.cargo.is_empty() {
        let list = ElementBuilder::new("div")?.class("cargo-list").build();
        for item in &record.cargo {
            let card = render_fields(cargo_fields(item))?;
            if let Some(url) = &item.photo_url {
                let photo = render_photo(url, &item.name)?;
                card.append_child(&photo)?;
            }
            list.append_child(&card)?;
        }
        let section = render_section("Pièces", list)?;
        container.append_child(&section)?;
    }

    if let Some(driver) = &record.driver {
        let card = render_fields(driver_fields(driver))?;
        if let Some(url) = &driver.photo_url {
            let photo = render_photo(url, &driver.full_name())?;
            card.append_child(&photo)?;
        }
        let section = render_section("Chauffeur", card)?;
        container.append_child(&section)?;
    }

    Ok(container)
}
