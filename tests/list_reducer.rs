use reusable_state::mvi::Reducer;
use reusable_state::store::{
    board_key, BoardPatch, EntityId, ListAction, ListReducer, ListState, QueryParams, Record,
    StoreExtension,
};
use serde_json::{json, Map, Value};

type State = ListState<Record>;

fn reduce(state: State, action: ListAction<Record>) -> State {
    ListReducer::<Record>::reduce(state, action)
}

fn rec(value: Value) -> Record {
    Record::from_value(value).unwrap()
}

fn meta(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn page(params: QueryParams, data: Vec<Record>, meta_data: Value, seq: u64) -> ListAction<Record> {
    ListAction::GetAllSuccess {
        params,
        data,
        meta_data: meta(meta_data),
        seq,
    }
}

#[test]
fn test_pages_accumulate_and_meta_is_latest() {
    let query = |p: u32| QueryParams::new().with("query", "a").with_page(p);

    let state = reduce(
        State::default(),
        page(query(1), vec![rec(json!({"id": 1}))], json!({"page": 1}), 1),
    );
    let state = reduce(
        state,
        page(query(2), vec![rec(json!({"id": 2}))], json!({"page": 2}), 2),
    );

    assert_eq!(state.boards.len(), 1);
    let board = state.board(&query(1)).unwrap();
    assert_eq!(board.list_map.len(), 2);
    assert_eq!(board.page(1), &[EntityId::Int(1)]);
    assert_eq!(board.page(2), &[EntityId::Int(2)]);
    assert_eq!(board.meta_data["page"], json!(2));
}

#[test]
fn test_delete_removes_from_every_board() {
    let all = QueryParams::new();
    let filtered = QueryParams::new().with("query", "r");
    let rex = || rec(json!({"id": 1, "name": "Rex"}));

    let state = reduce(
        State::default(),
        page(all.clone(), vec![rex(), rec(json!({"id": 2}))], json!({}), 1),
    );
    let state = reduce(state, page(filtered.clone(), vec![rex()], json!({}), 2));
    let state = reduce(
        state,
        ListAction::DeleteOneSuccess {
            id: EntityId::Int(1),
            seq: 3,
        },
    );

    assert!(state.is_deleted(&EntityId::Int(1)));
    assert!(state.map.contains_key(&EntityId::Int(1)));
    assert_eq!(state.board(&all).unwrap().page(1), &[EntityId::Int(2)]);
    assert!(state.board(&filtered).unwrap().page(1).is_empty());
}

#[test]
fn test_create_success_normalizes_identity() {
    let state = reduce(
        State::default(),
        ListAction::CreateOne(json!({"title": "Buy milk"})),
    );
    assert!(state.new_item.as_ref().unwrap().saving);

    let state = reduce(
        state,
        ListAction::CreateOneSuccess(rec(json!({"_id": "t1", "title": "Buy milk"}))),
    );

    assert!(state.new_item.is_none());
    assert_eq!(state.map.len(), 1);
    let created = state.entity(&EntityId::from("t1")).unwrap();
    assert_eq!(created.get("id"), created.get("_id"));
}

#[test]
fn test_board_keys() {
    let a1 = QueryParams::new().with("query", "a").with_page(1);
    let a2 = QueryParams::new().with("query", "a").with_page(2);
    let b1 = QueryParams::new().with("query", "b").with_page(1);

    assert_eq!(board_key(&a1), board_key(&a2));
    assert_ne!(board_key(&a1), board_key(&b1));
    assert_eq!(board_key(&QueryParams::new().with_page(3)), "");
}

#[test]
fn test_items_without_identity_are_skipped() {
    let state = reduce(
        State::default(),
        page(
            QueryParams::new(),
            vec![rec(json!({"name": "anonymous"})), rec(json!({"id": 5}))],
            json!({}),
            1,
        ),
    );

    assert_eq!(state.map.len(), 1);
    assert_eq!(
        state.board(&QueryParams::new()).unwrap().page(1),
        &[EntityId::Int(5)]
    );
}

#[test]
fn test_loading_patch_creates_board() {
    let params = QueryParams::new().with("query", "x");
    let state = reduce(
        State::default(),
        ListAction::SetAllItemsLoading {
            params: params.clone(),
            patch: BoardPatch::loading(),
        },
    );

    let board = state.board(&params).unwrap();
    assert!(board.loading);
    assert!(board.list_map.is_empty());
}

/// Extension that counts list fetches next to the built-in handling.
#[derive(Debug, Clone, Default, PartialEq)]
struct FetchCounter {
    fetched: u32,
}

#[derive(Debug, Clone)]
enum CounterAction {
    Bump,
}

impl StoreExtension<Record> for FetchCounter {
    type Action = CounterAction;

    fn reduce(mut state: ListState<Record, Self>, action: CounterAction) -> ListState<Record, Self> {
        match action {
            CounterAction::Bump => state.extra.fetched += 1,
        }
        state
    }
}

#[test]
fn test_extension_adds_to_builtin_actions() {
    type Counted = ListReducer<Record, FetchCounter>;

    let state = ListState::with_extra(FetchCounter { fetched: 1 });
    let state = Counted::reduce(state, ListAction::Custom(CounterAction::Bump));
    let state = Counted::reduce(
        state,
        ListAction::GetAllSuccess {
            params: QueryParams::new(),
            data: vec![rec(json!({"id": 1}))],
            meta_data: Map::new(),
            seq: 1,
        },
    );

    assert_eq!(state.extra.fetched, 2);
    assert!(state.entity(&EntityId::Int(1)).is_some());
}
