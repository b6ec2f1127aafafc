#[cfg(test)]
mod tests {
    use crate::action::*;
    use crate::animation::*;
    use crate::ime::*;
    use crate::node::*;
    use crate::stage::*;
    use crate::touch::*;
    use crate::{Color, Error, Rect, Size, Vec2};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(rect.contains(Vec2 { x: 110.0, y: 60.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF5733"), Color(255, 87, 51, 255));
        assert_eq!(Color::from_hex("#FF5733AA"), Color(255, 87, 51, 170));
        assert_eq!(Color::from_hex("nope"), Color::BLACK);
    }

    #[test]
    fn test_anchor_maps_to_position() {
        let mut tree = NodeTree::new();
        let n = tree.insert(
            Node::new()
                .with_size(Size::new(20.0, 10.0))
                .with_anchor(Vec2::new(0.5, 0.5))
                .with_position(Vec2::new(100.0, 50.0)),
        );
        let world = tree.convert_to_world_space(n, Vec2::new(10.0, 5.0));
        assert!(approx(world, Vec2::new(100.0, 50.0)));
        let local = tree.convert_to_node_space(n, Vec2::new(100.0, 50.0));
        assert!(approx(local, Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_scale_around_anchor() {
        let mut tree = NodeTree::new();
        let n = tree.insert(
            Node::new()
                .with_size(Size::new(20.0, 10.0))
                .with_anchor(Vec2::new(0.5, 0.5))
                .with_position(Vec2::new(100.0, 50.0)),
        );
        tree.get_mut(n).unwrap().set_scale(2.0);
        let origin = tree.convert_to_world_space(n, Vec2::ZERO);
        assert!(approx(origin, Vec2::new(80.0, 40.0)));
        let bb = tree.bounding_box(n);
        assert!((bb.w - 40.0).abs() < 1e-3 && (bb.h - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        tree.get_mut(n).unwrap().rotation = 90.0;
        let p = tree.convert_to_world_space(n, Vec2::new(1.0, 0.0));
        assert!(approx(p, Vec2::new(0.0, -1.0)));
        let back = tree.convert_to_node_space(n, p);
        assert!(approx(back, Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_parent_chain_transform() {
        let mut tree = NodeTree::new();
        let parent = tree.insert(Node::new().with_position(Vec2::new(10.0, 10.0)));
        let child = tree.insert(Node::new().with_position(Vec2::new(5.0, 5.0)));
        assert!(tree.add_child(parent, child));
        let p = tree.convert_to_world_space(child, Vec2::ZERO);
        assert!(approx(p, Vec2::new(15.0, 15.0)));
        assert_eq!(tree.ancestors(child).collect::<Vec<_>>(), vec![parent]);
    }

    #[test]
    fn test_scene_ignores_anchor() {
        let mut tree = NodeTree::new();
        let scene = tree.insert(Node::scene(Size::new(480.0, 320.0)));
        let p = tree.convert_to_world_space(scene, Vec2::new(12.0, 34.0));
        assert!(approx(p, Vec2::new(12.0, 34.0)));
        assert!(tree.hit_test(scene, Vec2::new(479.0, 1.0)));
        assert!(!tree.hit_test(scene, Vec2::new(481.0, 1.0)));
    }

    #[test]
    fn test_removed_ids_go_stale() {
        let mut tree = NodeTree::new();
        let parent = tree.insert(Node::new());
        let child = tree.insert(Node::new());
        tree.add_child(parent, child);
        assert!(tree.remove_subtree(parent));
        assert!(!tree.contains(child));

        let fresh = tree.insert(Node::new());
        assert_ne!(fresh, child);
        assert!(tree.get(child).is_none());
        assert!(!tree.add_child(fresh, child));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut tree = NodeTree::new();
        let a = tree.insert(Node::new());
        let b = tree.insert(Node::new());
        assert!(tree.add_child(a, b));
        assert!(!tree.add_child(b, a));
        assert!(!tree.add_child(a, a));
    }

    #[test]
    fn test_visibility_includes_ancestors() {
        let mut tree = NodeTree::new();
        let root = tree.insert(Node::new());
        let mid = tree.insert(Node::new());
        let leaf = tree.insert(Node::new());
        tree.add_child(root, mid);
        tree.add_child(mid, leaf);
        assert!(tree.is_visible_in_tree(leaf));
        tree.get_mut(root).unwrap().visible = false;
        assert!(!tree.is_visible_in_tree(leaf));
    }

    #[test]
    fn test_children_enter_running_parent() {
        let mut tree = NodeTree::new();
        let root = tree.insert(Node::new());
        tree.enter(root);
        let child = tree.insert(Node::new());
        tree.add_child(root, child);
        assert!(tree.is_running(child));
        tree.remove_child(root, child);
        assert!(!tree.is_running(child));
        assert!(tree.contains(child));
    }

    #[test]
    fn test_move_to_halfway() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(n, Action::move_to(2.0, Vec2::new(100.0, 0.0)));

        actions.tick(&mut tree, 1.0);
        assert!(approx(tree.get(n).unwrap().position, Vec2::new(50.0, 0.0)));
        assert!(actions.is_running(n));

        actions.tick(&mut tree, 1.0);
        assert!(approx(tree.get(n).unwrap().position, Vec2::new(100.0, 0.0)));
        assert!(actions.is_empty());
    }

    #[test]
    fn test_sequence_overshoot_completes_every_step() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(
            n,
            Action::sequence([
                Action::move_by(1.0, Vec2::new(10.0, 0.0)),
                Action::Hide,
                Action::cue(Cue::Custom(7)),
                Action::rotate_by(1.0, 90.0),
            ]),
        );

        let cues = actions.tick(&mut tree, 5.0);
        assert_eq!(cues, vec![(n, Cue::Custom(7))]);
        let node = tree.get(n).unwrap();
        assert!(approx(node.position, Vec2::new(10.0, 0.0)));
        assert!(!node.visible);
        assert!((node.rotation - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_cue_fires_once() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(
            n,
            Action::sequence([
                Action::cue(Cue::HideOutShowIn),
                Action::delay(1.0),
                Action::cue(Cue::Finish),
            ]),
        );
        assert_eq!(actions.tick(&mut tree, 0.25), vec![(n, Cue::HideOutShowIn)]);
        assert!(actions.tick(&mut tree, 0.25).is_empty());
        assert_eq!(actions.tick(&mut tree, 0.5), vec![(n, Cue::Finish)]);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_spawn_runs_in_parallel() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(
            n,
            Action::spawn([Action::scale_to(1.0, 2.0), Action::fade_out(2.0)]),
        );

        actions.tick(&mut tree, 1.0);
        let node = tree.get(n).unwrap();
        assert!((node.scale_x - 2.0).abs() < 1e-4);
        assert!((node.scale_y - 2.0).abs() < 1e-4);
        assert_eq!(node.opacity, 128);

        actions.tick(&mut tree, 1.0);
        assert_eq!(tree.get(n).unwrap().opacity, 0);
    }

    #[test]
    fn test_reversed_sequence() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new().with_position(Vec2::new(10.0, 0.0)));
        let forward = Action::sequence([
            Action::move_by(1.0, Vec2::new(10.0, 0.0)),
            Action::delay(0.5),
        ]);
        let back = forward.reversed();
        assert!((back.duration() - 1.5).abs() < 1e-6);
        assert!(matches!(&back, Action::Sequence(steps) if matches!(steps[0], Action::Delay(_))));

        let mut actions = ActionManager::new();
        actions.run(n, back);
        actions.tick(&mut tree, 1.5);
        assert!(approx(tree.get(n).unwrap().position, Vec2::ZERO));
    }

    #[test]
    fn test_eased_progress() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(
            n,
            Action::move_by(1.0, Vec2::new(100.0, 0.0)).eased(Easing::OutRate(2.0)),
        );
        actions.tick(&mut tree, 0.25);
        assert!(approx(tree.get(n).unwrap().position, Vec2::new(50.0, 0.0)));
    }

    #[test]
    fn test_spring_eased_sequence_lands_and_cues() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        // settles short of 1.0 at the end of the curve
        let spring = Easing::Spring {
            damping: 2.0,
            stiffness: 1.0,
        };
        assert!(spring.apply(1.0) < 0.9);
        actions.run(
            n,
            Action::sequence([
                Action::move_to(1.0, Vec2::new(100.0, 0.0)),
                Action::cue(Cue::Custom(3)),
            ])
            .eased(spring),
        );
        assert!(actions.tick(&mut tree, 0.5).is_empty());
        assert_eq!(actions.tick(&mut tree, 0.5), vec![(n, Cue::Custom(3))]);
        assert_eq!(tree.get(n).unwrap().position, Vec2::new(100.0, 0.0));
        assert!(!actions.is_running(n));
    }

    #[test]
    fn test_jump_lands_on_delta() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(n, Action::jump_by(1.0, Vec2::new(-100.0, 0.0), 25.0, 2));
        actions.tick(&mut tree, 0.25);
        // top of the first hop
        assert!(approx(tree.get(n).unwrap().position, Vec2::new(-25.0, 25.0)));
        actions.tick(&mut tree, 0.75);
        assert!(approx(tree.get(n).unwrap().position, Vec2::new(-100.0, 0.0)));
    }

    #[test]
    fn test_actions_on_removed_nodes_are_dropped() {
        let mut tree = NodeTree::new();
        let n = tree.insert(Node::new());
        let mut actions = ActionManager::new();
        actions.run(n, Action::sequence([Action::delay(1.0), Action::cue(Cue::Finish)]));
        tree.remove_subtree(n);
        assert!(actions.tick(&mut tree, 2.0).is_empty());
        assert!(actions.is_empty());
    }

    #[test]
    fn test_easing_reversal() {
        assert!(matches!(Easing::InRate(2.0).reversed(), Easing::OutRate(r) if r == 2.0));
        assert!(matches!(Easing::EaseOut.reversed(), Easing::EaseIn));
        assert!((Easing::Custom(|t| t * t).apply(0.5) - 0.25).abs() < 1e-6);
    }

    struct Recorder {
        node: NodeId,
        claim: bool,
        log: Rc<RefCell<Vec<String>>>,
        name: &'static str,
    }

    impl TouchDelegate for Recorder {
        fn node(&self) -> NodeId {
            self.node
        }
        fn touch_began(&mut self, _tree: &NodeTree, _touch: &Touch) -> bool {
            self.log.borrow_mut().push(format!("{}:began", self.name));
            self.claim
        }
        fn touch_moved(&mut self, _tree: &NodeTree, _touch: &Touch) {
            self.log.borrow_mut().push(format!("{}:moved", self.name));
        }
        fn touch_ended(&mut self, _tree: &NodeTree, _touch: &Touch) {
            self.log.borrow_mut().push(format!("{}:ended", self.name));
        }
        fn touch_cancelled(&mut self, _tree: &NodeTree, _touch: &Touch) {
            self.log.borrow_mut().push(format!("{}:cancelled", self.name));
        }
        fn on_exit(&mut self, _tree: &NodeTree) {
            self.log.borrow_mut().push(format!("{}:exit", self.name));
        }
    }

    #[test]
    fn test_dispatch_priority_and_swallow() {
        init_logging();
        let mut tree = NodeTree::new();
        let a = tree.insert(Node::new());
        let b = tree.insert(Node::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut dispatcher = TouchDispatcher::new();
        let late = shared(Recorder {
            node: b,
            claim: true,
            log: log.clone(),
            name: "late",
        });
        let early = shared(Recorder {
            node: a,
            claim: true,
            log: log.clone(),
            name: "early",
        });
        dispatcher.add_targeted(late, 0, true);
        dispatcher.add_targeted(early, -128, true);

        let t = Touch::new(1, 5.0, 5.0);
        assert!(dispatcher.dispatch(&tree, TouchPhase::Began, &t));
        assert!(dispatcher.dispatch(&tree, TouchPhase::Moved, &t));
        assert!(dispatcher.dispatch(&tree, TouchPhase::Ended, &t));
        // already ended: nobody tracks it
        assert!(!dispatcher.dispatch(&tree, TouchPhase::Moved, &t));

        assert_eq!(
            *log.borrow(),
            vec!["early:began", "early:moved", "early:ended"]
        );
    }

    #[test]
    fn test_dispatch_passes_unclaimed_touches_on() {
        init_logging();
        let mut tree = NodeTree::new();
        let a = tree.insert(Node::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = TouchDispatcher::new();
        dispatcher.add_targeted(
            shared(Recorder {
                node: a,
                claim: false,
                log: log.clone(),
                name: "first",
            }),
            -1,
            true,
        );
        dispatcher.add_targeted(
            shared(Recorder {
                node: a,
                claim: true,
                log: log.clone(),
                name: "second",
            }),
            1,
            false,
        );
        let t = Touch::new(3, 0.0, 0.0);
        assert!(dispatcher.dispatch(&tree, TouchPhase::Began, &t));
        dispatcher.cancel_all(&tree);
        assert_eq!(
            *log.borrow(),
            vec!["first:began", "second:began", "second:cancelled"]
        );

        dispatcher.set_enabled(false);
        assert!(!dispatcher.dispatch(&tree, TouchPhase::Began, &t));
        tree.remove_subtree(a);
        dispatcher.remove_delegates_under(&tree, a);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_stage_replace_releases_old_scene() {
        init_logging();
        let mut stage = Stage::new(StageConfig::default());
        let first = stage.create_scene();
        let second = stage.create_scene();
        stage.run_with_scene(first).unwrap();
        assert_eq!(stage.running_scene(), Some(first));

        stage.replace_scene(second).unwrap();
        assert_eq!(stage.running_scene(), Some(second));
        assert!(!stage.tree.contains(first));
        assert!(matches!(
            stage.replace_scene(first),
            Err(Error::MissingScene(id)) if id == first
        ));
    }

    #[test]
    fn test_stage_keeps_old_scene_without_cleanup() {
        init_logging();
        let mut stage = Stage::new(StageConfig::default().with_send_cleanup_to_scene(false));
        let first = stage.create_scene();
        let second = stage.create_scene();
        stage.run_with_scene(first).unwrap();
        stage.replace_scene(second).unwrap();
        assert!(stage.tree.contains(first));
        assert!(!stage.tree.is_running(first));
        assert!(stage.tree.is_running(second));
    }

    #[test]
    fn test_scene_exit_drops_claimed_touches() {
        init_logging();
        let mut stage = Stage::new(StageConfig::default().with_send_cleanup_to_scene(false));
        let first = stage.create_scene();
        let second = stage.create_scene();
        let button = stage.tree.insert(Node::new());
        stage.tree.add_child(first, button);
        stage.run_with_scene(first).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let delegate: SharedDelegate = shared(Recorder {
            node: button,
            claim: true,
            log: log.clone(),
            name: "button",
        });
        stage.touch_mut().add_targeted(delegate, 0, true);
        let t = Touch::new(4, 1.0, 1.0);
        {
            let (touch, tree) = stage.touch_and_tree();
            assert!(touch.dispatch(tree, TouchPhase::Began, &t));
        }

        stage.replace_scene(second).unwrap();
        assert_eq!(stage.touch().len(), 1);
        {
            let (touch, tree) = stage.touch_and_tree();
            assert!(!touch.dispatch(tree, TouchPhase::Ended, &t));
        }
        assert_eq!(*log.borrow(), vec!["button:began", "button:exit"]);

        stage.release_scene(first);
        assert!(stage.touch().is_empty());
        assert_eq!(log.borrow().last().map(String::as_str), Some("button:exit"));
    }

    #[test]
    fn test_stage_rejects_child_nodes_as_scenes() {
        let mut stage = Stage::default();
        let scene = stage.create_scene();
        let child = stage.tree.insert(Node::new());
        stage.tree.add_child(scene, child);
        assert!(matches!(stage.run_with_scene(child), Err(Error::NotAScene(_))));
    }

    #[test]
    fn test_ime_single_receiver() {
        let mut tree = NodeTree::new();
        let a = tree.insert(Node::new());
        let b = tree.insert(Node::new());
        let mut ime = ImeDispatcher::new();
        assert!(ime.attach(a));
        assert!(!ime.attach(a));
        assert!(!ime.detach(b));
        assert!(ime.attach(b));
        assert_eq!(ime.attached(), Some(b));
        assert!(ime.detach(b));
        ime.set_keyboard_visible(true);
        assert!(ime.keyboard_visible());
    }
}
