use approx::assert_abs_diff_eq;
use leaf_sprites::prelude::*;

fn tile(x: f32, y: f32) -> Sprite {
    Sprite::new(vec2(x, y), vec2(16.0, 16.0)).with_atlas_rect(160.0, 112.0, 0.0, 0.0, 16.0, 16.0)
}

#[test]
fn add_and_update() {
    let mut store = SpriteStore::new();
    assert!(store.is_empty());
    assert_eq!(store.capacity(), MAX_SPRITES);

    let grass = tile(320.0, 240.0);
    let rotated = tile(336.0, 240.0)
        .with_rotation(45.0)
        .with_atlas_rect(160.0, 112.0, 0.0, 96.0, 16.0, 16.0);
    assert_eq!(store.add(&grass), Ok(0));
    assert_eq!(store.add(&rotated), Ok(1));
    assert_eq!(store.sprite_count(), 2);
    assert_eq!(store.vertices().len(), 8);

    let first = store.slot_vertices(0).unwrap().to_vec();
    let second = store.slot_vertices(1).unwrap().to_vec();
    assert_eq!(first, grass.vertices());
    assert_eq!(second, rotated.vertices());
    assert_ne!(first, second);

    // the unrotated tile is axis aligned
    assert_eq!(first[0].position, vec2(312.0, 232.0));
    assert_eq!(first[2].position, vec2(328.0, 248.0));
    // the rotated tile keeps its center and its edge length
    let center = second.iter().map(|v| v.position).sum::<Vec2>() / 4.0;
    assert_abs_diff_eq!(center.x, 336.0, epsilon = 1e-4);
    assert_abs_diff_eq!(center.y, 240.0, epsilon = 1e-4);
    assert_abs_diff_eq!(
        glm::distance(&second[0].position, &second[1].position),
        16.0,
        epsilon = 1e-4
    );

    let mut moved = grass;
    moved.position.x += 5.0;
    assert_eq!(store.update(0, &moved), Ok(()));
    assert_eq!(store.sprite_count(), 2);
    let first_after = store.slot_vertices(0).unwrap();
    assert_eq!(first_after, moved.vertices());
    assert_eq!(first_after[0].position, vec2(317.0, 232.0));
    assert_eq!(store.slot_vertices(1).unwrap(), second.as_slice());
}

#[test]
fn add_on_full_batch() {
    let mut store = SpriteStore::with_capacity(3);
    for i in 0..3 {
        assert_eq!(store.add(&tile(i as f32 * 16.0, 0.0)), Ok(i));
    }
    assert!(store.is_full());
    let before = store.vertices().to_vec();

    assert_eq!(
        store.add(&tile(100.0, 100.0)),
        Err(BatchError::CapacityExceeded { capacity: 3 })
    );
    assert_eq!(store.sprite_count(), 3);
    assert_eq!(store.vertices(), before.as_slice());
}

#[test]
fn full_default_capacity() {
    let mut store = SpriteStore::new();
    for _ in 0..MAX_SPRITES {
        store.add(&tile(0.0, 0.0)).unwrap();
    }
    assert!(matches!(
        store.add(&tile(0.0, 0.0)),
        Err(BatchError::CapacityExceeded { .. })
    ));
    assert_eq!(store.sprite_count(), MAX_SPRITES);
}

#[test]
fn update_out_of_range() {
    let mut store = SpriteStore::with_capacity(4);
    assert_eq!(
        store.update(0, &tile(0.0, 0.0)),
        Err(BatchError::IndexOutOfRange {
            index: 0,
            sprite_count: 0
        })
    );

    store.add(&tile(10.0, 10.0)).unwrap();
    store.add(&tile(30.0, 10.0)).unwrap();
    let before = store.vertices().to_vec();

    // slots past the occupied prefix are rejected even when they are within the capacity
    for index in [2, 3, 4, usize::MAX] {
        assert_eq!(
            store.update(index, &tile(99.0, 99.0)),
            Err(BatchError::IndexOutOfRange {
                index,
                sprite_count: 2
            })
        );
    }
    assert_eq!(store.vertices(), before.as_slice());
}

#[test]
fn index_table_ignores_sprite_count() {
    let mut store = SpriteStore::with_capacity(16);
    for count in 0..=16 {
        for (i, quad) in store.indices().chunks(INDICES_PER_SPRITE).enumerate() {
            let b = 4 * i as u32;
            assert_eq!(quad, [b, b + 1, b + 2, b + 2, b + 3, b]);
        }
        assert_eq!(store.indices().len(), 16 * INDICES_PER_SPRITE);
        if count < 16 {
            store.add(&tile(0.0, 0.0)).unwrap();
        }
    }
}

#[test]
fn draw_index_count_follows_sprite_count() {
    let mut store = SpriteStore::with_capacity(5);
    assert_eq!(store.draw_index_count(), 0);
    for count in 1..=5 {
        store.add(&tile(0.0, 0.0)).unwrap();
        assert_eq!(store.draw_index_count(), count * 6);
        assert_eq!(store.vertices().len(), count * 4);
    }
    let _ = store.add(&tile(0.0, 0.0));
    assert_eq!(store.draw_index_count(), 5 * 6);
}

#[test]
fn atlas_mapping() {
    let tc = map_atlas_rect(160.0, 112.0, 0.0, 0.0, 16.0, 16.0);
    assert_eq!((tc.u0, tc.v0), (0.0, 0.0));
    assert_abs_diff_eq!(tc.u1, 0.1, epsilon = 1e-6);
    assert_abs_diff_eq!(tc.v1, 0.142_857_14, epsilon = 1e-6);
    assert_eq!(TexCoords::default(), TexCoords::FULL);
}

#[test]
fn error_messages() {
    assert_eq!(
        BatchError::CapacityExceeded { capacity: 1000 }.to_string(),
        "sprite batch full (capacity 1000)"
    );
    assert_eq!(
        BatchError::IndexOutOfRange {
            index: 7,
            sprite_count: 2
        }
        .to_string(),
        "invalid sprite index 7 (batch holds 2 sprites)"
    );
}

#[test]
fn full_batch_draw_count_fits_gl() {
    assert!(capacity_fits(MAX_BATCH_CAPACITY));
    assert!(!capacity_fits(MAX_BATCH_CAPACITY + 1));
    let full_draw = MAX_BATCH_CAPACITY * INDICES_PER_SPRITE;
    assert!(i32::try_from(full_draw).is_ok());
    assert!(i32::try_from(full_draw + INDICES_PER_SPRITE).is_err());
}
