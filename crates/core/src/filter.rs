//! The filtered, read-only projection a card renders and exports.

use crate::resource::{Resource, SearchScope};

/// Case-insensitive substring test over `fields`. An empty term matches.
pub fn matches_term(fields: &[&str], term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Records matching both the local and the global term, in store order.
pub fn filter_records<'a, R: Resource>(records: &'a [R], local: &str, global: &str) -> Vec<&'a R> {
    records
        .iter()
        .filter(|r| {
            matches_term(&r.search_fields(SearchScope::Local), local)
                && matches_term(&r.search_fields(SearchScope::Global), global)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Machine, PlantRef};

    fn machine(id: &str, name: &str) -> Machine {
        Machine {
            machine_id: id.into(),
            name: name.into(),
            model: String::new(),
            manufacturer: String::new(),
            serial_number: String::new(),
            plant_id: None,
            plant: None,
        }
    }

    fn sample() -> Vec<Machine> {
        let mut lathe = machine("3", "Lathe");
        lathe.serial_number = "SN-PUMPLESS".into();
        lathe.plant_id = Some("p1".into());
        lathe.plant = Some(PlantRef {
            plant_id: "p1".into(),
            name: "North Works".into(),
        });
        vec![machine("1", "Pump A"), machine("2", "Pump B"), lathe]
    }

    fn ids<'a>(records: &[&'a Machine]) -> Vec<&'a str> {
        records.iter().map(|m| m.machine_id.as_str()).collect()
    }

    #[test]
    fn local_search_is_case_insensitive() {
        let store = vec![machine("1", "Pump A"), machine("2", "Pump B")];
        let hits = filter_records(&store, "pump b", "");
        assert_eq!(hits, vec![&store[1]]);
    }

    #[test]
    fn empty_terms_match_everything() {
        let store = sample();
        assert_eq!(ids(&filter_records(&store, "", "")), ["1", "2", "3"]);
    }

    #[test]
    fn serial_number_is_a_local_field() {
        let store = sample();
        assert_eq!(ids(&filter_records(&store, "pumpless", "")), ["3"]);
    }

    #[test]
    fn global_term_covers_plant_name() {
        let store = sample();
        assert_eq!(ids(&filter_records(&store, "", "north")), ["3"]);
        assert!(filter_records(&store, "north", "").is_empty());
    }

    #[test]
    fn both_terms_must_match() {
        let store = sample();
        assert_eq!(ids(&filter_records(&store, "pump", "pump a")), ["1"]);
        // The lathe's serial contains "pump", so only a term it lacks excludes it.
        assert_eq!(ids(&filter_records(&store, "lathe", "pump")), ["3"]);
        assert!(filter_records(&store, "lathe", "pump a").is_empty());
    }

    #[test]
    fn projection_is_an_ordered_subsequence() {
        let store = sample();
        for term in ["", "p", "pump", "a", "LATHE", "zzz"] {
            let hits = filter_records(&store, term, "");
            let positions: Vec<usize> = hits
                .iter()
                .map(|h| store.iter().position(|m| m == *h).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "term {term:?}");
            for hit in &hits {
                assert!(matches_term(&hit.search_fields(SearchScope::Local), term));
            }
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let store = sample();
        for term in ["", "pump", "b", "sn-"] {
            let once: Vec<Machine> = filter_records(&store, term, "")
                .into_iter()
                .cloned()
                .collect();
            let twice: Vec<Machine> = filter_records(&once, term, "")
                .into_iter()
                .cloned()
                .collect();
            assert_eq!(once, twice, "term {term:?}");
        }
    }
}
