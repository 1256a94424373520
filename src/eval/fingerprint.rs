use crate::{
    eval::evaluator::{AvatarPhase, ReelPlan},
    foundation::math::Fnv1a64,
};

/// 128-bit hash of everything that varies between frames of one plan.
///
/// Computed from the plan's numeric per-frame quantities without building a
/// [`TimelineState`](crate::TimelineState), so it is much cheaper than a full evaluation. Two
/// frames with equal fingerprints evaluate to states that differ only in `frame`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateFingerprint {
    pub hi: u64,
    pub lo: u64,
}

pub fn fingerprint_frame(plan: &ReelPlan, frame: i64) -> StateFingerprint {
    let mut a = Fnv1a64::new_default();
    let mut b = Fnv1a64::new(0x9ae1_6a3b_2f90_404f);

    let active_idx = plan.milestones().active_index(frame);
    write_u64_pair(&mut a, &mut b, active_idx as u64);

    // Everything else about an avatar is fixed by its index.
    let limit = plan.milestones().as_slice()[active_idx].cumulative_avatars as usize;
    for index in 0..limit {
        write_u8_pair(
            &mut a,
            &mut b,
            match plan.avatar_phase(index, frame) {
                AvatarPhase::Hidden => 0,
                AvatarPhase::Entering => 1,
                AvatarPhase::Settled => 2,
            },
        );
        write_f64_pair(&mut a, &mut b, plan.avatar_scale(index, frame));
    }

    write_u64_pair(&mut a, &mut b, u64::from(plan.filler_count(frame)));
    write_u64_pair(&mut a, &mut b, plan.display_count(frame));
    write_f64_pair(&mut a, &mut b, plan.container_zoom(frame));
    write_f64_pair(&mut a, &mut b, plan.scroll_offset(frame));

    let banner = plan.celebration(frame);
    write_f64_pair(&mut a, &mut b, banner.height);
    write_f64_pair(&mut a, &mut b, banner.translate_y);
    write_f64_pair(&mut a, &mut b, banner.opacity);

    StateFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_f64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: f64) {
    write_u64_pair(a, b, v.to_bits());
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
