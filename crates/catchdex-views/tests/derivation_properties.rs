use catchdex_model::{Catalog, CaughtRecord, GameKey, Generation, RawSpecies};
use catchdex_views::{area_index, pokedex_view, species_in_area, trade_pairings, PokedexFilter};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn fixture_catalog() -> Catalog {
    let gen1: Vec<RawSpecies> = serde_json::from_str(
        r#"[
            {"id":1,"name":"Bulbasaur","types":["Grass"],"availability":{"red":{"catchable":false,"note":"Starter."}}},
            {"id":16,"name":"Pidgey","types":["Normal"],"availability":{"red":{"locations":["Route 1"]},"blue":{"locations":["Route 1"]}}},
            {"id":25,"name":"Pikachu","types":["Electric"],"availability":{"red":{"locations":["Viridian Forest"]}}}
        ]"#,
    )
    .expect("gen1 fixture");
    let gen2: Vec<RawSpecies> = serde_json::from_str(
        r#"[
            {"id":152,"name":"Chikorita","types":["Grass"],"availability":{"gold":{"catchable":false,"note":"Starter."}}},
            {"id":161,"name":"Sentret","types":["Normal"],"availability":{"gold":{"locations":["Route 29"]}}}
        ]"#,
    )
    .expect("gen2 fixture");
    Catalog::from_partitions(vec![(Generation::One, gen1), (Generation::Two, gen2)])
        .expect("catalog")
}

fn arb_record() -> impl Strategy<Value = CaughtRecord> {
    proptest::collection::vec((prop_oneof![Just(1u16), Just(16), Just(25), Just(152), Just(161)], any::<bool>()), 0..8)
        .prop_map(|writes| {
            let mut record = CaughtRecord::new();
            for (id, caught) in writes {
                record.set(id.to_string(), caught);
            }
            record
        })
}

fn arb_game() -> impl Strategy<Value = GameKey> {
    proptest::sample::select(GameKey::ALL.to_vec())
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn gen1_views_never_contain_gen2_species(record in arb_record(), search in "[a-z0-9]{0,4}", uncaught in any::<bool>()) {
        let catalog = fixture_catalog();
        for game in [GameKey::Red, GameKey::Blue, GameKey::Yellow] {
            let filter = PokedexFilter { search: search.clone(), uncaught_only: uncaught };
            let view = pokedex_view(&catalog, game, &record, &filter);
            prop_assert!(view
                .entries
                .iter()
                .all(|e| e.species.generation == Generation::One));

            for area in area_index(&catalog, game).areas() {
                prop_assert!(species_in_area(&catalog, game, area)
                    .iter()
                    .all(|s| s.generation == Generation::One));
            }
        }
    }

    #[test]
    fn pokedex_filter_is_stable_and_order_preserving(record in arb_record(), uncaught in any::<bool>()) {
        let catalog = fixture_catalog();
        let filter = PokedexFilter { search: String::new(), uncaught_only: uncaught };
        let view = pokedex_view(&catalog, GameKey::Gold, &record, &filter);
        let shown: Vec<u16> = view.entries.iter().map(|e| e.species.id.get()).collect();
        let mut expected: Vec<u16> = catalog
            .species()
            .iter()
            .map(|s| s.id.get())
            .collect();
        expected.retain(|id| shown.contains(id));
        prop_assert_eq!(shown, expected, "subsequence of catalog order");
    }

    #[test]
    fn trade_reciprocity_modulo_generation_asymmetry(
        my_record in arb_record(),
        partner_record in arb_record(),
        my_game in arb_game(),
        partner_game in arb_game(),
    ) {
        prop_assume!(my_game != partner_game);
        let catalog = fixture_catalog();
        let forward = trade_pairings(&catalog, my_game, partner_game, &my_record, &partner_record)
            .expect("forward");
        let reverse = trade_pairings(&catalog, partner_game, my_game, &partner_record, &my_record)
            .expect("reverse");

        let fwd_recv: Vec<u16> = forward.receivable.iter().map(|e| e.id.get()).collect();
        let rev_send: Vec<u16> = reverse.sendable.iter().map(|e| e.id.get()).collect();
        prop_assert_eq!(fwd_recv, rev_send);

        let fwd_send: Vec<u16> = forward.sendable.iter().map(|e| e.id.get()).collect();
        let rev_recv: Vec<u16> = reverse.receivable.iter().map(|e| e.id.get()).collect();
        prop_assert_eq!(fwd_send, rev_recv);
    }

    #[test]
    fn gen1_receivers_never_see_gen2_entries(
        partner_record in arb_record(),
    ) {
        let catalog = fixture_catalog();
        let pairings = trade_pairings(
            &catalog,
            GameKey::Red,
            GameKey::Gold,
            &CaughtRecord::new(),
            &partner_record,
        )
        .expect("pairings");
        prop_assert!(pairings.receivable.iter().all(|e| e.id.get() < 152));
    }
}
