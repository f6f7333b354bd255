//! Animation resampling tests
//!
//! Tests for:
//! - Redundant track detection
//! - Stack conversion (time base, ranges, rebasing, dropped stacks)
//! - Layer blending on top of the static pose
//! - Pivot re-derivation and the processed-once guard
//! - Full conversion runs producing NodeAnim channels

use glam::{Quat, Vec3};
use pivot_anim::animation::node_anim::AnimatedChannels;
use pivot_anim::animation::redundancy::{informative_channels, is_redundant};
use pivot_anim::animation::reorder::TrsSamples;
use pivot_anim::animation::resampler::AnimationResampler;
use pivot_anim::document::{
    AnimationCurve, AnimationCurveNode, AnimationLayer, AnimationStack, Axis, Document, GlobalSettings,
    LayerBlendMode, Model, NodeId, PropertyTable,
};
use pivot_anim::scene::naming::NodeNames;
use pivot_anim::settings::{ConvertSettings, FrameRate, TimeBase};
use pivot_anim::transform::component::{TransformChain, TransformComponent};
use pivot_anim::transform::resolver::resolve_model;
use pivot_anim::{NodeAnim, SceneConverter};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn quat_approx(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - EPSILON
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One output frame per tick.
fn frame_ticks_document() -> Document {
    Document::with_settings(GlobalSettings {
        frame_rate: FrameRate::Fps30,
        ticks_per_second: 30,
    })
}

fn time_base() -> TimeBase {
    TimeBase::new(30, FrameRate::Fps30)
}

/// Adds a single-channel curve node on a new layer of `stack`.
fn animate(
    doc: &mut Document,
    stack: &mut AnimationStack,
    target: u64,
    property: &str,
    axis: Axis,
    keys: &[(i64, f32)],
    mode: LayerBlendMode,
) {
    let curve = doc.add_curve(AnimationCurve::from_keys(keys.iter().copied()));
    let node = doc.add_curve_node(AnimationCurveNode::new(NodeId(target), property).with_channel(axis, curve));
    let layer = doc.add_layer(
        AnimationLayer::new(format!("Layer{}", stack.layers.len()))
            .with_blend(mode, 1.0)
            .with_curve_node(node),
    );
    stack.layers.push(layer);
}

/// Translation (1,0,0), scaling (2,2,2); one default layer holding two
/// translation curve nodes, X going 0 → 10 and Y staying 0 over ticks [0, 100].
fn end_to_end_document() -> Document {
    let mut doc = frame_ticks_document();
    doc.add_model(
        Model::new(1, "Model::Box").with_props(
            PropertyTable::new()
                .with_vec3("Lcl Translation", Vec3::new(1.0, 0.0, 0.0))
                .with_vec3("Lcl Scaling", Vec3::splat(2.0)),
        ),
    )
    .unwrap();

    let x = doc.add_curve(AnimationCurve::from_keys([(0, 0.0), (100, 10.0)]));
    let y = doc.add_curve(AnimationCurve::from_keys([(0, 0.0), (100, 0.0)]));
    let x = doc.add_curve_node(AnimationCurveNode::new(NodeId(1), "Lcl Translation").with_channel(Axis::X, x));
    let y = doc.add_curve_node(AnimationCurveNode::new(NodeId(1), "Lcl Translation").with_channel(Axis::Y, y));
    let layer = doc.add_layer(AnimationLayer::new("BaseLayer").with_curve_node(x).with_curve_node(y));
    doc.add_stack(AnimationStack::new("AnimStack::Take 001", 0, 100).with_layer(layer));
    doc
}

/// A node rotating about Z around the pivot (1,0,0).
fn pivot_document() -> Document {
    let mut doc = frame_ticks_document();
    doc.add_model(
        Model::new(5, "Hinge").with_props(PropertyTable::new().with_vec3("RotationPivot", Vec3::X)),
    )
    .unwrap();

    let mut stack = AnimationStack::new("Swing", 0, 100);
    animate(&mut doc, &mut stack, 5, "Lcl Rotation", Axis::Z, &[(0, 0.0), (100, 90.0)], LayerBlendMode::Override);
    doc.add_stack(stack);
    doc
}

fn assert_aligned(anim: &NodeAnim) {
    assert!(anim.keys.is_aligned(), "{} keys do not share a timeline", anim.node_name);
}

// ============================================================================
// Redundancy
// ============================================================================

#[test]
fn constant_samples_are_redundant() {
    let samples = vec![Vec3::splat(2.0); 5];
    assert!(is_redundant(&samples, Vec3::splat(2.0), 1e-6));
    assert!(is_redundant(&[], Vec3::ZERO, 1e-6));
}

#[test]
fn one_changed_sample_breaks_redundancy() {
    let mut samples = vec![Vec3::new(1.0, 0.0, 0.0); 5];
    samples[3].y = 0.01;
    assert!(!is_redundant(&samples, Vec3::new(1.0, 0.0, 0.0), 1e-6));
}

#[test]
fn informative_channels_keeps_only_moving_components() {
    let chain = TransformChain::default();
    let samples = TrsSamples {
        translation: vec![Vec3::ZERO, Vec3::X],
        rotation: vec![Vec3::ZERO, Vec3::ZERO],
        scaling: vec![Vec3::ONE, Vec3::ONE],
    };
    let animated = informative_channels(&samples, &chain, AnimatedChannels::all(), 1e-6);
    assert_eq!(animated, AnimatedChannels::TRANSLATION);

    let animated = informative_channels(&samples, &chain, AnimatedChannels::ROTATION, 1e-6);
    assert!(animated.is_empty());
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn translation_curves_on_static_pose() {
    init_logger();
    let doc = end_to_end_document();
    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();

    assert_eq!(scene.animations.len(), 1);
    let animation = &scene.animations[0];
    assert_eq!(animation.name, "Take 001");
    assert_eq!(animation.start, 0.0);
    assert_eq!(animation.stop, 100.0);
    assert_eq!(animation.duration, 100.0);

    let anim = animation.channel("Box").expect("Box is animated");
    assert_eq!(anim.channels, AnimatedChannels::TRANSLATION);
    assert_aligned(anim);

    let t = anim.position_keys();
    assert_eq!(t.len(), 2);
    assert_eq!(t[0].time, 0.0);
    assert!(vec3_approx(t[0].value, Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(t[1].time, 100.0);
    assert!(vec3_approx(t[1].value, Vec3::new(11.0, 0.0, 0.0)));

    for key in anim.scaling_keys() {
        assert!(vec3_approx(key.value, Vec3::splat(2.0)));
    }
    for key in anim.rotation_keys() {
        assert!(quat_approx(key.value, Quat::IDENTITY));
    }
}

#[test]
fn redundant_components_leave_the_timeline() {
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(2, "Arm")).unwrap();

    let mut stack = AnimationStack::new("Wave", 0, 100);
    // Rotation stays at the rest pose but contributes extra ticks.
    animate(&mut doc, &mut stack, 2, "Lcl Rotation", Axis::X, &[(0, 0.0), (25, 0.0), (50, 0.0), (100, 0.0)], LayerBlendMode::Override);
    animate(&mut doc, &mut stack, 2, "Lcl Translation", Axis::Z, &[(0, 0.0), (100, 4.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    let anim = scene.animations[0].channel("Arm").unwrap();
    assert_eq!(anim.channels, AnimatedChannels::TRANSLATION);
    assert_eq!(anim.position_keys().len(), 2);
    assert_aligned(anim);

    // Without filtering, the rotation ticks stay.
    let settings = ConvertSettings {
        remove_redundant_tracks: false,
        ..Default::default()
    };
    let scene = SceneConverter::convert(&doc, &settings).unwrap();
    let anim = scene.animations[0].channel("Arm").unwrap();
    assert_eq!(anim.channels, AnimatedChannels::TRANSLATION | AnimatedChannels::ROTATION);
    assert_eq!(anim.position_keys().len(), 4);
    assert!(vec3_approx(anim.position_keys()[1].value, Vec3::new(0.0, 0.0, 1.0)));
}

#[test]
fn fully_redundant_stacks_are_dropped() {
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(3, "Still").with_props(PropertyTable::new().with_vec3("Lcl Translation", Vec3::Y)))
        .unwrap();

    let mut stack = AnimationStack::new("Idle", 0, 10);
    animate(&mut doc, &mut stack, 3, "Lcl Translation", Axis::Y, &[(0, 1.0), (10, 1.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    assert!(scene.animations.is_empty());
}

#[test]
fn non_transform_properties_are_ignored() {
    init_logger();
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(4, "Lamp")).unwrap();

    let mut stack = AnimationStack::new("Blink", 0, 10);
    animate(&mut doc, &mut stack, 4, "Visibility", Axis::X, &[(0, 0.0), (10, 1.0)], LayerBlendMode::Override);
    animate(&mut doc, &mut stack, 4, "RotationPivot", Axis::X, &[(0, 0.0), (10, 1.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    assert!(scene.animations.is_empty());
}

// ============================================================================
// Time base
// ============================================================================

#[test]
fn unbounded_stack_spans_observed_keys_and_rebases() {
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(1, "Ball")).unwrap();

    let mut stack = AnimationStack::new("Bounce", 0, 0);
    animate(&mut doc, &mut stack, 1, "Lcl Translation", Axis::Y, &[(30, 0.0), (60, 5.0), (90, 0.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    let animation = &scene.animations[0];
    assert_eq!(animation.start, 30.0);
    assert_eq!(animation.stop, 90.0);
    assert_eq!(animation.duration, 60.0);

    let times: Vec<f64> = animation.channels[0].position_keys().iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 30.0, 60.0]);

    let settings = ConvertSettings {
        rebase_key_times: false,
        ..Default::default()
    };
    let scene = SceneConverter::convert(&doc, &settings).unwrap();
    assert_eq!(scene.animations[0].channels[0].position_keys()[0].time, 30.0);
}

#[test]
fn frame_rate_override_scales_key_times() {
    let mut doc = end_to_end_document();
    doc.settings.frame_rate = FrameRate::Pal;

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    assert_eq!(scene.animations[0].ticks_per_second, 25.0);
    assert!((scene.animations[0].stop - 100.0 * 25.0 / 30.0).abs() < 1e-9);

    let settings = ConvertSettings {
        frame_rate: Some(FrameRate::Fps60),
        ..Default::default()
    };
    let scene = SceneConverter::convert(&doc, &settings).unwrap();
    let keys = scene.animations[0].channels[0].position_keys();
    assert_eq!(keys[1].time, 200.0);
}

#[test]
fn range_clips_curves_and_rebases_to_range_start() {
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(1, "Slider")).unwrap();

    let mut stack = AnimationStack::new("Slide", 20, 80);
    animate(&mut doc, &mut stack, 1, "Lcl Translation", Axis::X, &[(0, 0.0), (100, 100.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    let keys = scene.animations[0].channels[0].position_keys();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].time, 0.0);
    assert_eq!(keys[1].time, 60.0);
    assert!(vec3_approx(keys[0].value, Vec3::new(20.0, 0.0, 0.0)));
    assert!(vec3_approx(keys[1].value, Vec3::new(80.0, 0.0, 0.0)));
}

// ============================================================================
// Pivot resampling
// ============================================================================

#[test]
fn pivot_nodes_are_resampled_through_the_chain() {
    init_logger();
    let doc = pivot_document();
    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    let anim = scene.animations[0].channel("Hinge").unwrap();
    assert_aligned(anim);

    // Rotating about the pivot moves the origin, so translation animates too.
    assert_eq!(anim.channels, AnimatedChannels::TRANSLATION | AnimatedChannels::ROTATION);

    let t = anim.position_keys();
    assert!(vec3_approx(t[0].value, Vec3::ZERO));
    // Rp · Rz(90) · Rp⁻¹ moves the origin to (1,-1,0).
    assert!(vec3_approx(t[1].value, Vec3::new(1.0, -1.0, 0.0)));
    assert!(quat_approx(anim.rotation_keys()[1].value, Quat::from_rotation_z(90f32.to_radians())));
}

#[test]
fn plain_keys_ignore_pivots_when_resampling_is_off() {
    let doc = pivot_document();
    let settings = ConvertSettings {
        resample_pivots: false,
        ..Default::default()
    };
    let scene = SceneConverter::convert(&doc, &settings).unwrap();
    let anim = scene.animations[0].channel("Hinge").unwrap();
    assert!(vec3_approx(anim.position_keys()[1].value, Vec3::ZERO));
}

#[test]
fn resampling_a_target_twice_re_derives_once() {
    init_logger();
    let doc = pivot_document();
    let mut names = NodeNames::new();
    let mut resampler = AnimationResampler::new(time_base(), &ConvertSettings::default());
    resampler.convert_animations(&doc, &mut names);

    let node = NodeId(5);
    let plain = resampler.animations()[0].channels[0].clone();
    assert!(vec3_approx(plain.position_keys()[1].value, Vec3::ZERO));
    assert!(!resampler.is_resampled(node));

    // A different pivot than the model's own one.
    let mut chain = resolve_model(doc.model(node).unwrap());
    chain.set_active(TransformComponent::RotationPivot, Vec3::new(0.0, 2.0, 0.0));

    assert_eq!(resampler.resample_with_pivots(&doc, node, &chain), 1);
    assert!(resampler.is_resampled(node));
    let derived = resampler.animations()[0].channels[0].clone();
    assert_ne!(derived, plain);
    // Rp=(0,2,0): Rp - Rz(90)·Rp = (2,2,0)
    assert!(vec3_approx(derived.position_keys()[1].value, Vec3::new(2.0, 2.0, 0.0)));

    // Guarded: a second request neither recurses nor rewrites the channel.
    assert_eq!(resampler.resample_with_pivots(&doc, node, &TransformChain::default()), 0);
    assert_eq!(resampler.animations()[0].channels[0], derived);
}

#[test]
fn resampling_replaces_channels_that_match_the_static_pose() {
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(6, "Crate")).unwrap();
    let mut stack = AnimationStack::new("Hold", 0, 10);
    animate(&mut doc, &mut stack, 6, "Lcl Translation", Axis::X, &[(0, 3.0), (10, 3.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let mut names = NodeNames::new();
    let mut resampler = AnimationResampler::new(time_base(), &ConvertSettings::default());
    resampler.convert_animations(&doc, &mut names);
    let plain = resampler.animations()[0].channels[0].clone();
    assert_eq!(plain.channels, AnimatedChannels::TRANSLATION);
    assert!(quat_approx(plain.rotation_keys()[0].value, Quat::IDENTITY));

    let mut chain = resolve_model(doc.model(NodeId(6)).unwrap());
    chain.set_active(TransformComponent::Translation, Vec3::new(3.0, 0.0, 0.0));
    chain.set_active(TransformComponent::PreRotation, Vec3::new(0.0, 0.0, 90.0));

    assert_eq!(resampler.resample_with_pivots(&doc, NodeId(6), &chain), 1);
    let derived = &resampler.animations()[0].channels[0];
    assert!(derived.channels.is_empty());
    assert_aligned(derived);
    let pre_rotation = Quat::from_rotation_z(90f32.to_radians());
    for (r, t) in derived.rotation_keys().iter().zip(derived.position_keys()) {
        assert!(quat_approx(r.value, pre_rotation));
        assert!(vec3_approx(t.value, Vec3::new(3.0, 0.0, 0.0)));
    }
}

#[test]
fn resampling_covers_every_stack_of_a_target() {
    let mut doc = pivot_document();
    let mut stack = AnimationStack::new("Swing Back", 0, 50);
    animate(&mut doc, &mut stack, 5, "Lcl Rotation", Axis::Z, &[(0, 90.0), (50, 0.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let mut names = NodeNames::new();
    let mut resampler = AnimationResampler::new(time_base(), &ConvertSettings::default());
    resampler.convert_animations(&doc, &mut names);
    assert_eq!(resampler.animated_nodes(), vec![NodeId(5)]);
    assert_eq!(resampler.targets().len(), 2);

    let chain = resolve_model(doc.model(NodeId(5)).unwrap());
    assert_eq!(resampler.resample_with_pivots(&doc, NodeId(5), &chain), 2);

    let back = &resampler.animations()[1].channels[0];
    assert!(vec3_approx(back.position_keys()[0].value, Vec3::new(1.0, -1.0, 0.0)));
    assert!(vec3_approx(back.position_keys()[1].value, Vec3::ZERO));
}

#[test]
fn resampling_unknown_targets_is_a_no_op() {
    let doc = pivot_document();
    let mut resampler = AnimationResampler::new(time_base(), &ConvertSettings::default());
    assert_eq!(resampler.resample_with_pivots(&doc, NodeId(999), &TransformChain::default()), 0);
}

#[test]
fn channel_names_match_hierarchy_names() {
    let mut doc = frame_ticks_document();
    doc.add_model(Model::new(1, "Model::Cube")).unwrap();
    doc.add_model(Model::new(2, "Cube")).unwrap();

    let mut stack = AnimationStack::new("Spin", 0, 10);
    animate(&mut doc, &mut stack, 2, "Lcl Rotation", Axis::Y, &[(0, 0.0), (10, 45.0)], LayerBlendMode::Override);
    doc.add_stack(stack);

    let scene = SceneConverter::convert(&doc, &ConvertSettings::default()).unwrap();
    assert_eq!(scene.node_for(NodeId(2)).unwrap().name, "Cube001");
    let anim = &scene.animations[0].channels[0];
    assert_eq!(anim.node_name, "Cube001");
    assert_eq!(anim.target, NodeId(2));
}
