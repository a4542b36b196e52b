//! Sample DBBE records for API testing.

use serde_json::{Value, json};

/// Documents keyed by entity path, in the format `MemoryEngine::load_json` reads.
pub fn sample_documents() -> Value {
    json!({
        "manuscripts": [
            {
                "id": 1, "name": "Athos, Iviron 5", "public": true,
                "city": {"id": 10, "name": "Athos"},
                "library": {"id": 20, "name": "Iviron"},
                "content": [{"id": 100, "name": "Gospels"}],
                "date_floor_year": 1050, "date_ceiling_year": 1100,
                "comment": "check the binding", "public_comment": "fine uncial",
                "management": [{"id": 4, "name": "Needs review (internal)"}]
            },
            {
                "id": 2, "name": "Vaticanus gr. 1", "public": true,
                "city": {"id": 11, "name": "Vatican City"},
                "library": {"id": 21, "name": "BAV"},
                "content": [{"id": 100, "name": "Gospels"}],
                "date_floor_year": 1200, "date_ceiling_year": 1300
            },
            {
                "id": 3, "name": "Athos, Lavra B 12", "public": false,
                "city": {"id": 10, "name": "Athos"},
                "library": {"id": 22, "name": "Lavra"},
                "date_floor_year": 1000, "date_ceiling_year": 1050
            }
        ],
        "occurrences": [
            {
                "id": 1, "incipit": "Βίβλος βασιλέως", "public": true,
                "text": "βίβλος βασιλέως καὶ βασιλεύς",
                "manuscript": {"id": 1, "name": "Athos, Iviron 5"}
            },
            {
                "id": 2, "incipit": "Ἄρχων", "public": true,
                "text": "βασιλεύς μέγας",
                "manuscript": {"id": 2, "name": "Vaticanus gr. 1"}
            },
            {
                "id": 3, "incipit": "Ἀγαθός", "public": false,
                "text": "ἄλλος βασιλεύς",
                "manuscript": {"id": 1, "name": "Athos, Iviron 5"},
                "text_status": {"id": 5, "name": "Not checked"}
            }
        ],
        "persons": [
            {"id": 7, "name": "Ioannes Tzetzes", "public": true, "historical": true}
        ]
    })
}
