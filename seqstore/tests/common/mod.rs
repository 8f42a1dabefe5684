//! 各后端共用的契约用例
#![allow(dead_code)]

use anyhow::Result as AnyResult;
use seqstore::backend::Backend;
use seqstore::{Store, StoreError, Version, Versioned};
use seqstore_macros::versioned;
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

#[versioned]
#[derive(PartialEq)]
pub struct Foo {
    pub label: String,
    pub count: i64,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("seqstore=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn stored_version<B: Backend<Foo>>(store: &Store<Foo, B>, id: &str) -> AnyResult<u64> {
    Ok(store.read(id)?.version().value())
}

/// 新建实体版本为 0，且 id 互不相同
pub fn create_issues_distinct_fresh_entities<B: Backend<Foo>>(
    store: &Store<Foo, B>,
) -> AnyResult<()> {
    let mut seen = HashSet::new();
    for _ in 0..5 {
        let (id, foo) = store.create()?;
        assert!(!id.is_empty());
        assert!(foo.version().is_new());
        assert!(seen.insert(id));
    }

    let (ids, foos) = store.create_multi(3)?;
    assert_eq!(ids.len(), 3);
    assert_eq!(foos.len(), 3);
    for (id, foo) in ids.into_iter().zip(foos) {
        assert!(foo.version().is_new());
        assert!(seen.insert(id));
    }
    Ok(())
}

/// Create → Update → 过期 Update → Delete → Read
pub fn concrete_scenario<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    let (id, mut foo) = store.create()?;
    assert_eq!(foo.version(), Version::new());

    let mut stale = foo.clone();
    store.update(&id, &mut foo)?;
    assert_eq!(stored_version(store, &id)?, 1);

    let err = store.update(&id, &mut stale).unwrap_err();
    assert!(err.is_conflict(), "unexpected {err:?}");
    assert_eq!(stored_version(store, &id)?, 1);

    store.delete(&id)?;
    assert!(store.read(&id).unwrap_err().is_not_found());
    // 删除后更新同样是不存在，而不是“版本 0”
    let mut fresh = Foo::default();
    assert!(store.update(&id, &mut fresh).unwrap_err().is_not_found());
    Ok(())
}

/// 更新保存完整负载，调用方实体可连续复用
pub fn update_overwrites_payload<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    let (id, mut foo) = store.create()?;
    for n in 1..=3 {
        foo.count = n;
        foo.label = format!("rev-{n}");
        store.update(&id, &mut foo)?;
        assert_eq!(foo.version().value(), n as u64);
    }

    let stored = store.read(&id)?;
    assert_eq!(stored, foo);
    assert_eq!(stored.label, "rev-3");
    Ok(())
}

/// 批量读取按 ids 顺序返回；任一缺失则整体 NotFound
pub fn read_multi_is_ordered_and_all_or_nothing<B: Backend<Foo>>(
    store: &Store<Foo, B>,
) -> AnyResult<()> {
    let (ids, mut foos) = store.create_multi(3)?;
    for (i, (id, foo)) in ids.iter().zip(foos.iter_mut()).enumerate() {
        foo.count = i as i64;
        store.update(id, foo)?;
    }

    let reversed: Vec<String> = ids.iter().rev().cloned().collect();
    let read = store.read_multi(&reversed)?;
    let counts: Vec<i64> = read.iter().map(|f| f.count).collect();
    assert_eq!(counts, vec![2, 1, 0]);

    let mut with_missing = ids.clone();
    with_missing.push("no-such-id".to_string());
    match store.read_multi(&with_missing) {
        Err(StoreError::NotFound { id }) => assert_eq!(id, "no-such-id"),
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

/// 批量更新中一条过期即整体失败，任何实体都不变
pub fn update_multi_is_all_or_nothing<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    let (ids, mut foos) = store.create_multi(2)?;

    // 让第二个实体在存储中前进到版本 1
    let mut ahead = foos[1].clone();
    store.update(&ids[1], &mut ahead)?;

    foos[0].label = "should not persist".into();
    let err = store.update_multi(&ids, &mut foos).unwrap_err();
    match err {
        StoreError::ConcurrencyConflict {
            id,
            expected,
            actual,
        } => {
            assert_eq!(id, ids[1]);
            assert_eq!(expected.value(), 0);
            assert_eq!(actual.value(), 1);
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(stored_version(store, &ids[0])?, 0);
    assert_eq!(stored_version(store, &ids[1])?, 1);
    assert_eq!(store.read(&ids[0])?.label, "");
    assert!(foos.iter().all(|f| f.version().is_new()));

    // 重读后重试成功
    let mut fresh = store.read_multi(&ids)?;
    store.update_multi(&ids, &mut fresh)?;
    assert_eq!(fresh[0].version().value(), 1);
    assert_eq!(fresh[1].version().value(), 2);
    Ok(())
}

/// 批量更新中包含不存在的 id 时整体 NotFound 且不写入
pub fn update_multi_with_missing_id_writes_nothing<B: Backend<Foo>>(
    store: &Store<Foo, B>,
) -> AnyResult<()> {
    let (id, foo) = store.create()?;
    let ids = vec![id.clone(), "ghost".to_string()];
    let mut foos = vec![foo, Foo::default()];

    let err = store.update_multi(&ids, &mut foos).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(stored_version(store, &id)?, 0);
    assert!(store.read("ghost").unwrap_err().is_not_found());
    Ok(())
}

pub fn length_mismatch<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    let (ids, _) = store.create_multi(2)?;
    let mut foos = vec![Foo::default()];
    let err = store.update_multi(&ids, &mut foos).unwrap_err();
    assert!(matches!(
        err,
        StoreError::LengthMismatch {
            ids: 2,
            entities: 1
        }
    ));
    Ok(())
}

pub fn delete_multi_removes_all<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    let (ids, _) = store.create_multi(3)?;
    store.delete_multi(&ids[..2])?;

    assert!(store.read(&ids[0]).unwrap_err().is_not_found());
    assert!(store.read(&ids[1]).unwrap_err().is_not_found());
    assert!(store.read(&ids[2]).is_ok());
    Ok(())
}

pub fn empty_batches_are_noops<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    let (ids, foos) = store.create_multi(0)?;
    assert!(ids.is_empty() && foos.is_empty());
    assert!(store.read_multi(&[])?.is_empty());
    store.update_multi(&[], &mut [])?;
    store.delete_multi(&[])?;
    Ok(())
}

pub fn run_contract<B: Backend<Foo>>(store: &Store<Foo, B>) -> AnyResult<()> {
    create_issues_distinct_fresh_entities(store)?;
    concrete_scenario(store)?;
    update_overwrites_payload(store)?;
    read_multi_is_ordered_and_all_or_nothing(store)?;
    update_multi_is_all_or_nothing(store)?;
    update_multi_with_missing_id_writes_nothing(store)?;
    length_mismatch(store)?;
    delete_multi_removes_all(store)?;
    empty_batches_are_noops(store)?;
    Ok(())
}
