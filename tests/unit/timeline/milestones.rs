use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn avatars(m: &Milestones) -> Vec<u32> {
    m.iter().map(|m| m.cumulative_avatars).collect()
}

#[test]
fn capacity_limits_the_finale() {
    let m = generate(1000.0, 640, fps30(), &[]);
    assert_eq!(celebration_capacity(640), 18);
    assert_eq!(m.finale().cumulative_avatars, 18);
    assert_eq!(m.finale().others_count, 17);
    assert_eq!(avatars(&m), [4, 9, 13, 18]);
}

#[test]
fn frames_follow_start_delay_and_interval() {
    let m = generate(1000.0, 640, fps30(), &[]);
    let frames: Vec<i64> = m.iter().map(|m| m.activation_frame).collect();
    assert_eq!(frames, [9, 39, 69, 99]);

    let m60 = generate(1000.0, 1920, Fps::new(60, 1).unwrap(), &[]);
    let frames: Vec<i64> = m60.iter().map(|m| m.activation_frame).collect();
    assert_eq!(frames, [18, 78, 138, 198]);
}

#[test]
fn small_counts_use_fixed_tables() {
    assert_eq!(avatars(&generate(1.0, 640, fps30(), &[])), [1, 1, 1, 1]);
    assert_eq!(avatars(&generate(2.0, 640, fps30(), &[])), [1, 1, 2, 2]);
    assert_eq!(avatars(&generate(3.0, 640, fps30(), &[])), [1, 2, 3, 3]);
}

#[test]
fn edge_counts_keep_the_repair_pass_behaviour() {
    assert_eq!(avatars(&generate(4.0, 640, fps30(), &[])), [1, 2, 3, 4]);
    assert_eq!(avatars(&generate(5.0, 640, fps30(), &[])), [1, 2, 3, 5]);
    assert_eq!(avatars(&generate(6.0, 640, fps30(), &[])), [1, 3, 4, 6]);
    assert_eq!(avatars(&generate(8.0, 640, fps30(), &[])), [2, 4, 6, 8]);
}

#[test]
fn invalid_counts_are_sanitized() {
    for raw in [f64::NAN, f64::INFINITY, -3.0, 0.0, 0.5] {
        assert_eq!(avatars(&generate(raw, 640, fps30(), &[])), [1, 1, 1, 1]);
    }
}

#[test]
fn invariants_hold_across_counts_and_widths() {
    for width in [0u32, 1, 320, 640, 1280, 1920, 3840] {
        for count in (1..200).chain([1_000, 1_000_000]) {
            let m = generate(count as f64, width, fps30(), &[]);
            assert_eq!(m.as_slice().len(), MILESTONE_COUNT);
            for pair in m.as_slice().windows(2) {
                assert!(pair[0].activation_frame < pair[1].activation_frame);
                assert!(pair[0].cumulative_avatars <= pair[1].cumulative_avatars);
            }
            let expected = (count as u64).min(u64::from(celebration_capacity(width))) as u32;
            assert_eq!(m.finale().cumulative_avatars, expected);
            assert!(m.iter().all(|m| m.cumulative_avatars >= 1));
            if expected >= 4 {
                for pair in m.as_slice().windows(2) {
                    assert!(pair[0].cumulative_avatars < pair[1].cumulative_avatars);
                }
            }
        }
    }
}

#[test]
fn names_come_from_four_or_more_followers() {
    let people: Vec<Entity> = ["ada", "", "cy", "dee", "eve"]
        .into_iter()
        .map(Entity::named)
        .collect();
    let m = generate(100.0, 640, fps30(), &people);
    let names: Vec<&str> = m.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, ["ada", "Alex", "cy", "dee"]);

    let m = generate(100.0, 640, fps30(), &people[..3]);
    let names: Vec<&str> = m.iter().map(|m| m.display_name.as_str()).collect();
    assert_eq!(names, FALLBACK_NAMES);
}

#[test]
fn active_and_previous_resolution() {
    let m = generate(1000.0, 640, fps30(), &[]);
    assert_eq!(m.active_index(-100), 0);
    assert_eq!(m.active_index(0), 0);
    assert!(m.previous(0).is_none());
    assert_eq!(m.active_index(9), 0);
    assert_eq!(m.active_index(38), 0);
    assert_eq!(m.active_index(39), 1);
    assert_eq!(m.previous(39).unwrap().activation_frame, 9);
    assert_eq!(m.active_index(99), 3);
    assert_eq!(m.active_index(10_000), 3);
    assert_eq!(m.previous(10_000).unwrap().activation_frame, 69);
}

#[test]
fn frame_timing_rounds_per_fps() {
    let t = FrameTiming::new(fps30());
    assert_eq!(
        t,
        FrameTiming {
            stagger: 2,
            fast_stagger: 1,
            fade: 12,
            milestone_interval: 30,
            start_delay: 9,
            spring_settle: 10,
            spring_delay: 3,
        }
    );
    // Staggers never drop below one frame.
    let slow = FrameTiming::new(Fps::new(5, 1).unwrap());
    assert_eq!(slow.stagger, 1);
    assert_eq!(slow.fast_stagger, 1);
}

#[test]
fn sub_unit_fps_keeps_milestones_apart() {
    let fps = Fps::new(1, 3).unwrap();
    assert_eq!(FrameTiming::new(fps).milestone_interval, 1);

    let m = generate(1000.0, 640, fps, &[]);
    let frames: Vec<i64> = m.iter().map(|m| m.activation_frame).collect();
    assert!(frames.windows(2).all(|w| w[0] < w[1]), "{frames:?}");
}

#[test]
fn milestones_serialize_as_a_plain_array() {
    let m = generate(10.0, 640, fps30(), &[]);
    let v = serde_json::to_value(&m).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 4);
    assert_eq!(v[0]["activationFrame"], 9);
    assert_eq!(v[3]["cumulativeAvatars"], 10);
}
