use perfdash::table::{
    PageSize, Record, SortDirection, StatusFilter, TableConfig, Value, ViewState, filter, paginate,
    process, run, search, sort,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Pos,
    Name,
    Score,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Status {
    Up,
    Down,
    Idle,
}

#[derive(Clone, Debug, PartialEq)]
struct Item {
    pos: usize,
    name: String,
    score: f64,
    status: Status,
}

impl Record for Item {
    type Field = Field;
    type Status = Status;

    const FIELDS: &'static [Field] = &[Field::Pos, Field::Name, Field::Score];

    fn value(&self, field: Field) -> Option<Value<'_>> {
        Some(match field {
            Field::Pos => Value::Number(self.pos as f64),
            Field::Name => Value::Text(&self.name),
            Field::Score => Value::Number(self.score),
        })
    }

    fn status(&self) -> Status {
        self.status
    }
}

fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![Just(Status::Up), Just(Status::Down), Just(Status::Idle)]
}

/// Items with few distinct scores so ties are common
fn items(max: usize) -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(("[a-z]{0,6}", 0i32..5, status_strategy()), 0..max).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(pos, (name, score, status))| Item {
                pos,
                name,
                score: f64::from(score),
                status,
            })
            .collect()
    })
}

fn config(page_size: usize) -> TableConfig<Field> {
    TableConfig {
        page_size: PageSize::fixed(page_size),
        initial_sort: (Field::Score, SortDirection::Ascending),
        new_field_direction: SortDirection::Ascending,
        status_filter: true,
    }
}

fn positions(rows: &[&Item]) -> Vec<usize> {
    rows.iter().map(|item| item.pos).collect()
}

proptest! {
    #[test]
    fn filter_is_idempotent(data in items(40), status in status_strategy()) {
        let only = StatusFilter::Only(status);
        let once = filter(data.iter().collect::<Vec<_>>(), &only);
        let twice = filter(once.clone(), &only);
        prop_assert_eq!(positions(&once), positions(&twice));
    }

    #[test]
    fn empty_search_is_identity(data in items(40)) {
        let rows: Vec<&Item> = data.iter().collect();
        prop_assert_eq!(positions(&search(rows.clone(), "")), positions(&rows));
    }

    #[test]
    fn sort_is_stable(data in items(40), descending in any::<bool>()) {
        let direction = if descending { SortDirection::Descending } else { SortDirection::Ascending };
        let mut rows: Vec<&Item> = data.iter().collect();
        sort(&mut rows, Field::Score, direction);
        for pair in rows.windows(2) {
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].pos < pair[1].pos);
            }
        }
    }

    #[test]
    fn sort_directions_reverse_without_ties(
        scores in prop::collection::hash_set(-1000i32..1000, 0..30)
    ) {
        let data: Vec<Item> = scores
            .into_iter()
            .enumerate()
            .map(|(pos, s)| Item { pos, name: String::new(), score: f64::from(s), status: Status::Up })
            .collect();
        let mut asc: Vec<&Item> = data.iter().collect();
        sort(&mut asc, Field::Score, SortDirection::Ascending);
        let mut desc: Vec<&Item> = data.iter().collect();
        sort(&mut desc, Field::Score, SortDirection::Descending);
        desc.reverse();
        prop_assert_eq!(positions(&asc), positions(&desc));
    }

    #[test]
    fn pages_cover_processed_rows_once(data in items(60), page_size in 1usize..15, term in "[a-c]{0,1}") {
        let cfg = config(page_size);
        let mut state = ViewState::<Field, Status>::new(&cfg);
        state.set_search(term);
        let processed = process(data.iter().collect::<Vec<_>>(), &state, &cfg);

        let total_pages = cfg.page_size.total_pages(processed.len());
        let mut joined = Vec::new();
        for page in 1..=total_pages {
            joined.extend_from_slice(paginate(&processed, page, cfg.page_size).rows);
        }
        prop_assert_eq!(positions(&joined), positions(&processed));
    }

    #[test]
    fn page_past_end_is_empty(data in items(30), page_size in 1usize..10, extra in 1usize..5) {
        let cfg = config(page_size);
        let mut state = ViewState::<Field, Status>::new(&cfg);
        let total_pages = run(&data, &state, &cfg).total_pages;
        state.page = total_pages + extra;

        let model = run(&data, &state, &cfg);
        prop_assert!(model.rows.is_empty());
        prop_assert_eq!(model.total_pages, total_pages);
        prop_assert_eq!(model.total_count, data.len());
    }
}

#[test]
fn equal_values_keep_input_order() {
    let data: Vec<Item> = [("B", 10.0), ("A", 10.0), ("C", 5.0)]
        .into_iter()
        .enumerate()
        .map(|(pos, (name, score))| Item {
            pos,
            name: name.to_string(),
            score,
            status: Status::Up,
        })
        .collect();
    let cfg = config(50);
    let state = ViewState::<Field, Status>::new(&cfg);
    let names: Vec<&str> = run(&data, &state, &cfg)
        .rows
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);
}

#[test]
fn third_page_of_120() {
    let data: Vec<Item> = (0..120)
        .map(|pos| Item {
            pos,
            name: format!("item{pos}"),
            score: pos as f64,
            status: Status::Idle,
        })
        .collect();
    let cfg = config(50);
    let mut state = ViewState::<Field, Status>::new(&cfg);
    state.page = 3;
    let model = run(&data, &state, &cfg);
    assert_eq!(model.total_pages, 3);
    assert_eq!(positions(&model.rows), (100..120).collect::<Vec<_>>());
    assert_eq!(model.summary("items"), "Showing 101 to 120 of 120 items");
}
