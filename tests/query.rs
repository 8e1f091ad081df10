use anyhow::Result;
use rusqlite::{Connection, Row};
use rust_sqlite_keys::{query_for_maps, query_mapped, ResultMap, RowExt, RowsExt, Value};

const SQL_QUERY_SINGLE_ENTITY: &str = "SELECT id, name FROM test_table WHERE name = ?1";
const SQL_QUERY_MANY_ENTITIES: &str = "SELECT id, name FROM test_table ORDER BY id";
const SQL_QUERY_ATTRIBUTE_OF_MANY_ENTITIES: &str = "SELECT name FROM test_table ORDER BY id";

#[derive(Debug, PartialEq)]
struct NameEntity {
    id: i64,
    name: String,
}

fn entity_row_mapper(row: &Row<'_>, _row_num: usize) -> rusqlite::Result<NameEntity> {
    Ok(NameEntity {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn create_test_db() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(
        r#"
        CREATE TABLE test_table (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );
        INSERT INTO test_table (name) VALUES ('A'), ('B'), ('C'), ('D'), ('E'), ('F');
        "#,
    )?;
    Ok(conn)
}

#[test]
fn test_query_single_entity() {
    test_query_single_entity_impl().unwrap();
}

fn test_query_single_entity_impl() -> Result<()> {
    let conn = create_test_db()?;

    let found = query_mapped(&conn, SQL_QUERY_SINGLE_ENTITY, ["A"], entity_row_mapper)?;
    assert_eq!(
        found,
        vec![NameEntity {
            id: 1,
            name: "A".to_string()
        }]
    );

    let missing = query_mapped(&conn, SQL_QUERY_SINGLE_ENTITY, ["Z"], entity_row_mapper)?;
    assert!(missing.is_empty());
    Ok(())
}

#[test]
fn test_query_many_entities() {
    test_query_many_entities_impl().unwrap();
}

fn test_query_many_entities_impl() -> Result<()> {
    let conn = create_test_db()?;
    let entities = query_mapped(&conn, SQL_QUERY_MANY_ENTITIES, [], entity_row_mapper)?;

    assert_eq!(entities.len(), 6);
    assert_eq!(entities[5].name, "F");
    Ok(())
}

#[test]
fn test_map_rows_single_attribute() {
    test_map_rows_single_attribute_impl().unwrap();
}

fn test_map_rows_single_attribute_impl() -> Result<()> {
    let conn = create_test_db()?;
    let mut stmt = conn.prepare(SQL_QUERY_ATTRIBUTE_OF_MANY_ENTITIES)?;
    let mut rows = stmt.query([])?;

    let names: Vec<String> = rows.map_rows(|row| row.get(0))?;
    assert_eq!(names, vec!["A", "B", "C", "D", "E", "F"]);
    Ok(())
}

#[test]
fn test_query_all_attributes_as_maps() {
    test_query_all_attributes_as_maps_impl().unwrap();
}

fn test_query_all_attributes_as_maps_impl() -> Result<()> {
    let conn = create_test_db()?;
    let maps = query_for_maps(&conn, SQL_QUERY_MANY_ENTITIES, [])?;

    let expected: Vec<ResultMap> = ["A", "B", "C", "D", "E", "F"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| {
            ResultMap::from([
                ("id".to_string(), Value::Integer(id)),
                ("name".to_string(), Value::from(name)),
            ])
        })
        .collect();
    assert_eq!(maps, expected);
    Ok(())
}

#[test]
fn test_row_values_by_name_and_index() {
    test_row_values_by_name_and_index_impl().unwrap();
}

fn test_row_values_by_name_and_index_impl() -> Result<()> {
    let conn = create_test_db()?;
    let mut stmt = conn.prepare(SQL_QUERY_SINGLE_ENTITY)?;
    let mut rows = stmt.query(["C"])?;

    let pairs = rows.map_rows(|row| {
        let id = row.value(0)?.as_ref().and_then(Value::get::<i64>);
        let name = row.value("name")?.as_ref().and_then(Value::get::<String>);
        let missing = row.value("age")?;
        Ok((id, name, missing))
    })?;

    assert_eq!(pairs, vec![(Some(3), Some("C".to_string()), None)]);
    Ok(())
}
