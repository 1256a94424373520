use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn cfg(count: f64) -> ReelConfig {
    ReelConfig {
        follower_count: count,
        width: 640,
        height: 360,
        fps: fps30(),
        duration_in_frames: 210,
        ..ReelConfig::default()
    }
}

fn plan(count: f64) -> ReelPlan {
    ReelPlan::new(&cfg(count)).unwrap()
}

fn milestone(frame: i64, avatars: u32) -> Milestone {
    Milestone {
        activation_frame: frame,
        display_name: "x".to_owned(),
        others_count: u64::from(avatars.saturating_sub(1)),
        cumulative_avatars: avatars,
    }
}

#[test]
fn appear_frame_staggers_within_the_owning_milestone() {
    let m = Milestones::from_array([
        milestone(0, 3),
        milestone(60, 8),
        milestone(120, 12),
        milestone(180, 16),
    ]);
    let timing = FrameTiming::new(fps30());
    assert_eq!(timing.stagger, 2);
    assert_eq!(appear_frame(5, &m, &timing), 64);
    assert_eq!(appear_frame(3, &m, &timing), 60);
    assert_eq!(appear_frame(0, &m, &timing), 0);
    // Finale avatars use the fast stagger.
    assert_eq!(appear_frame(14, &m, &timing), 182);
}

#[test]
fn appear_frames_for_generated_milestones() {
    let p = plan(1000.0);
    assert_eq!(p.appear_frame(1), 11);
    assert_eq!(p.appear_frame(3), 15);
    assert_eq!(p.appear_frame(4), 39);
    assert_eq!(p.appear_frame(13), 99);
    assert_eq!(p.appear_frame(17), 103);
}

#[test]
fn first_avatar_is_always_fully_visible() {
    let p = plan(1000.0);
    for frame in [i64::MIN, -10, 0, 5, 99, 500, i64::MAX] {
        assert_eq!(p.avatar_scale(0, frame), 1.0);
    }
    let s = p.evaluate_frame(0);
    assert_eq!(s.avatars[0].phase, AvatarPhase::Settled);
    assert_eq!(s.avatars[0].opacity, 1.0);
    assert_eq!(s.avatars[0].color, crate::composition::theme::FIRST_AVATAR_COLOR);
}

#[test]
fn avatar_scale_is_zero_before_appearing_and_bounded_after() {
    let p = plan(1000.0);
    assert_eq!(p.avatar_scale(1, 10), 0.0);
    assert_eq!(p.avatar_scale(1, 11), 0.0);
    for frame in 11..200 {
        let s = p.avatar_scale(1, frame);
        assert!((0.0..=1.0).contains(&s), "frame {frame}: {s}");
    }
    assert!((p.avatar_scale(1, 200) - 1.0).abs() < 1e-3);
}

#[test]
fn avatar_phase_follows_settle_time() {
    let p = plan(1000.0);
    let phase = |frame| p.evaluate_frame(frame).avatars[1].phase;
    assert_eq!(phase(10), AvatarPhase::Hidden);
    assert_eq!(phase(11), AvatarPhase::Entering);
    assert_eq!(phase(20), AvatarPhase::Entering);
    assert_eq!(phase(21), AvatarPhase::Settled);
}

#[test]
fn visible_avatars_track_the_active_milestone() {
    let p = plan(1000.0);
    assert_eq!(p.evaluate_frame(-5).avatars.len(), 4);
    assert_eq!(p.evaluate_frame(50).avatars.len(), 9);
    assert_eq!(p.evaluate_frame(80).avatars.len(), 13);
    assert_eq!(p.evaluate_frame(150).avatars.len(), 18);

    let s = p.evaluate_frame(150);
    assert_eq!(s.avatars[0].z_index, 100);
    assert_eq!(s.avatars[5].z_index, 95);
    assert_eq!(s.avatars[0].margin_left, 0.0);
    assert_eq!(s.avatars[1].margin_left, -16.0);
}

#[test]
fn display_count_counts_up_per_milestone() {
    let p = plan(1000.0);
    assert_eq!(p.display_count(-1), 0);
    assert_eq!(p.display_count(5), 0);
    // First milestone: 3 new avatars, counts 0 -> 3 over frames 12..18.
    assert_eq!(p.display_count(9), 0);
    assert_eq!(p.display_count(12), 0);
    assert_eq!(p.display_count(15), 2);
    assert_eq!(p.display_count(18), 3);
    assert_eq!(p.display_count(38), 3);
    // Second milestone counts 3 -> 8.
    assert_eq!(p.display_count(39), 3);
    assert_eq!(p.display_count(60), 8);
}

#[test]
fn finale_converges_on_total_minus_one() {
    let p = plan(1000.0);
    assert_eq!(p.display_count(102), 12);
    assert_eq!(p.display_count(107), 999);
    assert_eq!(p.display_count(209), 999);

    let mut last = 0;
    for frame in 0..210 {
        let c = p.display_count(frame);
        assert!(c >= last, "count went backwards at {frame}");
        last = c;
    }
}

#[test]
fn single_follower_never_says_others() {
    let p = plan(1.0);
    for frame in [0, 9, 50, 120, 209] {
        let s = p.evaluate_frame(frame);
        assert_eq!(s.display_count, 0);
        assert_eq!(s.label.text, format!("{} followed you", s.display_name));
    }
}

#[test]
fn two_followers_finish_on_one_other() {
    let p = plan(2.0);
    assert_eq!(p.display_count(200), 1);
    assert_eq!(
        p.evaluate_frame(200).label.text,
        "Cheers and 1 others followed you"
    );
}

#[test]
fn label_falls_back_to_milestone_names() {
    let p = plan(1000.0);
    let s = p.evaluate_frame(0);
    assert_eq!(s.display_name, "John");
    assert_eq!(s.label.text, "John followed you");

    let s = p.evaluate_frame(200);
    assert_eq!(s.display_name, "Cheers");
    assert_eq!(s.label.text, "Cheers and 999 others followed you");
    assert!(!s.label.verified);
}

#[test]
fn label_names_the_follower_at_the_head_of_the_line() {
    let mut c = cfg(1000.0);
    c.followers = Some(vec![
        Entity::named("ana"),
        Entity {
            verified: Some(true),
            ..Entity::named("ben")
        },
        Entity::named("cy"),
        Entity::named("dee"),
        Entity::named("eve"),
    ]);
    let p = ReelPlan::new(&c).unwrap();

    assert_eq!(p.evaluate_frame(0).display_name, "ana");
    let at = |count: u64| (0..210).find(|&f| p.display_count(f) == count).unwrap();
    let s = p.evaluate_frame(at(1));
    assert_eq!(s.display_name, "ben");
    assert!(s.label.verified);
    assert!(s.avatars[1].verified);

    // Past the supplied list the milestone name is shown.
    let s = p.evaluate_frame(200);
    assert_eq!(s.display_name, "dee");
}

#[test]
fn zoom_eases_in_then_springs_back() {
    let p = plan(1000.0);
    assert_eq!(p.container_zoom(-20), ZOOM);
    assert_eq!(p.container_zoom(0), ZOOM);
    assert_eq!(p.container_zoom(98), 1.0);
    assert_eq!(p.container_zoom(99), 1.0);
    assert!(p.container_zoom(50) < ZOOM && p.container_zoom(50) > 1.0);
    assert!((p.container_zoom(2000) - ZOOM).abs() < 1e-6);
}

#[test]
fn scroll_starts_after_all_avatars_are_visible() {
    let p = plan(1000.0);
    assert_eq!(p.all_avatars_visible_frame(), 114);
    assert_eq!(p.scroll_offset(113), 0.0);
    assert_eq!(p.scroll_offset(114), 0.0);
    assert_eq!(p.scroll_offset(210), -SCROLL_DISTANCE);

    let mut last = 0.0;
    for frame in 114..260 {
        let s = p.scroll_offset(frame);
        assert!(s <= last && s >= -SCROLL_DISTANCE);
        last = s;
    }
}

#[test]
fn scroll_stays_put_when_the_video_ends_first() {
    let mut c = cfg(1000.0);
    c.duration_in_frames = 100;
    let p = ReelPlan::new(&c).unwrap();
    for frame in [0, 99, 114, 500] {
        assert_eq!(p.scroll_offset(frame), 0.0);
    }
}

#[test]
fn fillers_pad_short_strips_once_scrolling() {
    let p = plan(5.0);
    assert_eq!(p.milestones().finale().cumulative_avatars, 5);
    assert_eq!(p.all_avatars_visible_frame(), 111);
    assert_eq!(p.filler_count(110), 0);
    assert_eq!(p.filler_count(111), 15);

    let s = p.evaluate_frame(150);
    assert_eq!(s.filler_avatar_count(), 15);
    assert_eq!(s.fillers[0].index, 5);
    assert_eq!(s.fillers[0].color, filler_color(5));
    assert!(s.fillers.iter().all(|f| f.z_index >= 1));

    assert_eq!(plan(1000.0).filler_count(200), 0);
}

#[test]
fn celebration_banner_slides_in_with_the_finale() {
    let p = plan(1000.0);
    let before = p.celebration(98);
    assert_eq!(before.height, 0.0);
    assert_eq!(before.translate_y, 30.0);
    assert_eq!(before.opacity, 0.0);

    let start = p.celebration(99);
    assert_eq!(start.height, 0.0);
    assert_eq!(start.opacity, 0.0);

    assert_eq!(p.celebration(111).opacity, 1.0);
    let late = p.celebration(2000);
    assert!((late.height - CELEBRATION_HEIGHT).abs() < 1e-6);
    assert!(late.translate_y.abs() < 1e-6);
}

#[test]
fn evaluation_order_does_not_matter() {
    let p = plan(1000.0);
    let forward: Vec<_> = (0..210).map(|f| p.evaluate_frame(f)).collect();
    let mut backward: Vec<_> = (0..210).rev().map(|f| p.evaluate_frame(f)).collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(p.evaluate_frame(150), forward[150]);
}

#[test]
fn any_frame_is_accepted() {
    let p = plan(1000.0);
    for frame in [i64::MIN, -1, 0, 209, 210, 10_000, i64::MAX] {
        let s = p.evaluate_frame(frame);
        assert_eq!(s.frame, frame);
        assert!(s.container_zoom.is_finite());
        assert!(s.scroll_offset.is_finite());
        assert!(s.scroll_offset <= 0.0);
    }
}

#[test]
fn plan_rejects_invalid_config() {
    let mut c = cfg(1000.0);
    c.duration_in_frames = 0;
    assert!(ReelPlan::new(&c).is_err());
}

#[test]
fn colors_follow_theme() {
    let mut c = cfg(10.0);
    c.theme = Theme::LightsOut;
    let p = ReelPlan::new(&c).unwrap();
    assert_eq!(p.evaluate_frame(0).colors, Theme::LightsOut.colors());
}

#[test]
fn counts_get_thousands_separators() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1000), "1,000");
    assert_eq!(format_count(49_999), "49,999");
    assert_eq!(format_count(1_234_567), "1,234,567");
    assert_eq!(label_text("Ana", 1500), "Ana and 1,500 others followed you");
}

#[test]
fn state_serializes_with_camel_case_fields() {
    let s = plan(1000.0).evaluate_frame(150);
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["displayCount"], 999);
    assert!(v["activeMilestone"]["cumulativeAvatars"].is_u64());
    assert!(v["avatars"][0]["appearFrame"].is_i64());
    assert!(v["celebration"]["translateY"].is_number());
}

#[test]
fn sub_unit_fps_starts_on_the_first_milestone() {
    let p = ReelPlan::new(&ReelConfig {
        fps: Fps::new(1, 3).unwrap(),
        ..cfg(1000.0)
    })
    .unwrap();
    let first = &p.milestones().as_slice()[0];
    let state = p.evaluate_frame(first.activation_frame);
    assert_eq!(state.active_milestone, *first);
    assert!(state.previous_milestone.is_none());
    assert!(p.finale_frame() > first.activation_frame);
}
