use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use test_log::test;

use super::*;
use crate::common::collections::{HashMap, HashSet};
use crate::model::{Rect, Windows};
use crate::sim::{DEFAULT_ACTIVITY, SimWindow, StaticWorkspace, WindowSpec};

const MARGIN: i32 = 5;

#[derive(Debug, Clone, PartialEq)]
struct ApplyCall {
    surface: Surface,
    tiling_area: Rect,
    windows: Vec<String>,
}

type CallLog = Rc<RefCell<Vec<ApplyCall>>>;

struct RecordingLayout {
    surface: Surface,
    log: CallLog,
}

impl TilingLayout for RecordingLayout {
    fn tiling_area(&self, working_area: Rect) -> Rect {
        working_area.inset(MARGIN, MARGIN, MARGIN, MARGIN)
    }

    fn apply<W: Window>(&mut self, tiling_area: Rect, windows: &[W]) {
        self.log.borrow_mut().push(ApplyCall {
            surface: self.surface.clone(),
            tiling_area,
            windows: windows.iter().map(|w| w.caption()).collect(),
        });
    }

    fn handle_command(&mut self, command: &LayoutCommand) -> bool {
        matches!(command, LayoutCommand::IncreaseMasterCount)
    }
}

#[derive(Default)]
struct RecordingLayouts {
    layouts: HashMap<Surface, RecordingLayout>,
    failing: HashSet<Surface>,
    log: CallLog,
}

impl LayoutRegistry for RecordingLayouts {
    type Layout = RecordingLayout;

    fn layout_on_surface(&mut self, surface: &Surface) -> Result<&mut RecordingLayout, EngineError> {
        if self.failing.contains(surface) {
            return Err(EngineError::NoLayout(surface.clone()));
        }
        let log = self.log.clone();
        Ok(self.layouts.entry(surface.clone()).or_insert_with(|| RecordingLayout {
            surface: surface.clone(),
            log,
        }))
    }
}

type TestEngine = Engine<StaticWorkspace, Windows<SimWindow>, RecordingLayouts>;

fn screen(index: i32) -> Rect { Rect::new(index * 1000, 0, 1000, 800) }

fn engine(desktops: u32, screens: i32) -> TestEngine {
    let workspace = StaticWorkspace::new((0..screens).map(screen).collect(), desktops);
    Engine::new(workspace, Windows::new(), RecordingLayouts::default())
}

fn surface(desktop: u32, screen: u32) -> Surface { Surface::new(desktop, screen, DEFAULT_ACTIVITY) }

fn window(caption: &str) -> SimWindow {
    SimWindow::new(WindowSpec {
        caption: caption.into(),
        ..WindowSpec::default()
    })
}

fn calls(engine: &TestEngine) -> Vec<ApplyCall> { engine.layouts().log.borrow().clone() }

fn called_surfaces(engine: &TestEngine) -> Vec<Surface> {
    calls(engine).into_iter().map(|c| c.surface).collect()
}

fn clear_calls(engine: &TestEngine) { engine.layouts().log.borrow_mut().clear(); }

fn add_all(engine: &mut TestEngine, windows: &[&SimWindow]) {
    for w in windows {
        assert!(engine.add_window((*w).clone()).is_admitted());
    }
    clear_calls(engine);
}

mod admission {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn ineligible_windows_are_never_managed() {
        let mut engine = engine(1, 1);
        let cases = [
            (
                WindowSpec { special: true, ..WindowSpec::default() },
                RejectReason::Special,
            ),
            (
                WindowSpec { dialog: true, ..WindowSpec::default() },
                RejectReason::Dialog,
            ),
            (
                WindowSpec { keep_above: true, ..WindowSpec::default() },
                RejectReason::KeepAbove,
            ),
            (
                WindowSpec {
                    special: true,
                    dialog: true,
                    keep_above: true,
                    ..WindowSpec::default()
                },
                RejectReason::Special,
            ),
        ];

        for (spec, reason) in cases {
            let window = SimWindow::new(spec);
            assert_eq!(engine.add_window(window.clone()), Admission::Rejected(reason));
            assert!(!engine.windows().contains(&window));
        }
        assert!(engine.windows().is_empty());
        assert!(calls(&engine).is_empty());
    }

    #[test]
    fn admitted_window_arranges_only_its_surfaces() {
        let mut engine = engine(3, 2);
        let window = SimWindow::new(WindowSpec {
            caption: "sticky".into(),
            desktops: vec![1, 3],
            screen: 1,
            ..WindowSpec::default()
        });

        let admission = engine.add_window(window.clone());

        assert_eq!(
            admission,
            Admission::Admitted { surfaces: vec![surface(1, 1), surface(3, 1)] }
        );
        assert!(engine.windows().contains(&window));
        assert_eq!(called_surfaces(&engine), vec![surface(1, 1), surface(3, 1)]);
        assert_eq!(calls(&engine)[0].windows, vec!["sticky".to_string()]);
    }

    #[test]
    fn removal_does_not_rearrange() {
        let mut engine = engine(1, 1);
        let a = window("a");
        let b = window("b");
        add_all(&mut engine, &[&a, &b]);

        engine.remove_window(&b);

        assert!(calls(&engine).is_empty());
        assert_eq!(engine.windows().visible_windows_on(&surface(1, 0)), vec![a]);
    }

    #[test]
    fn removing_an_unknown_window_is_silent() {
        let mut engine = engine(1, 1);
        engine.remove_window(&window("ghost"));
        assert!(engine.windows().is_empty());
    }

    #[test]
    fn add_then_remove_restores_registry() {
        let mut engine = engine(2, 2);
        let a = window("a");
        add_all(&mut engine, &[&a]);
        let before: Vec<_> = engine
            .all_surfaces()
            .iter()
            .map(|s| engine.windows().visible_windows_on(s))
            .collect();

        let b = SimWindow::new(WindowSpec {
            caption: "b".into(),
            desktops: vec![1, 2],
            ..WindowSpec::default()
        });
        assert!(engine.add_window(b.clone()).is_admitted());
        engine.remove_window(&b);

        let after: Vec<_> = engine
            .all_surfaces()
            .iter()
            .map(|s| engine.windows().visible_windows_on(s))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn keep_above_after_admission_keeps_window_tiled() {
        let mut engine = engine(1, 1);
        let a = window("a");
        add_all(&mut engine, &[&a]);

        a.set_keep_above(true);
        let _ = engine.arrange_windows_on_visible_surfaces();

        assert_eq!(calls(&engine)[0].windows, vec!["a".to_string()]);
    }
}

mod arrangement {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn all_surfaces_are_arranged_desktop_major() {
        let mut engine = engine(2, 3);
        let report = engine.arrange_windows_on_all_surfaces();

        let expected = vec![
            surface(1, 0),
            surface(1, 1),
            surface(1, 2),
            surface(2, 0),
            surface(2, 1),
            surface(2, 2),
        ];
        assert!(report.is_complete());
        assert_eq!(report.arranged, expected);
        assert_eq!(called_surfaces(&engine), expected);
    }

    #[test]
    fn visible_surfaces_follow_current_desktop() {
        let mut engine = engine(3, 2);
        engine.workspace_mut().current_desktop = 2;

        let report = engine.arrange_windows_on_visible_surfaces();

        assert_eq!(report.arranged, vec![surface(2, 0), surface(2, 1)]);
        assert_eq!(called_surfaces(&engine), vec![surface(2, 0), surface(2, 1)]);
    }

    #[test]
    fn surfaces_use_current_activity() {
        let mut engine = engine(1, 1);
        engine.workspace_mut().current_activity = "focus".into();
        let _ = engine.arrange_windows_on_all_surfaces();
        assert_eq!(called_surfaces(&engine), vec![Surface::new(1, 0, "focus")]);
    }

    #[test]
    fn tiling_area_comes_from_the_layout() {
        let mut engine = engine(1, 2);
        let a = SimWindow::new(WindowSpec {
            caption: "a".into(),
            screen: 1,
            ..WindowSpec::default()
        });
        add_all(&mut engine, &[&a]);

        engine.arrange_windows_on_surface(&surface(1, 1)).unwrap();

        assert_eq!(
            calls(&engine),
            vec![ApplyCall {
                surface: surface(1, 1),
                tiling_area: Rect::new(1005, 5, 990, 790),
                windows: vec!["a".into()],
            }]
        );
    }

    #[test]
    fn arranging_twice_is_idempotent() {
        let mut engine = engine(1, 1);
        add_all(&mut engine, &[&window("a"), &window("b")]);

        engine.arrange_windows_on_surface(&surface(1, 0)).unwrap();
        engine.arrange_windows_on_surface(&surface(1, 0)).unwrap();

        let calls = calls(&engine);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn duplicates_are_arranged_twice() {
        let mut engine = engine(1, 1);
        let report = engine.arrange_windows_on_surfaces(&[surface(1, 0), surface(1, 0)]);
        assert_eq!(report.arranged.len(), 2);
        assert_eq!(calls(&engine).len(), 2);
    }

    #[test]
    fn one_failing_surface_does_not_stop_the_batch() {
        let mut engine = engine(2, 2);
        engine.layouts_mut().failing.insert(surface(1, 1));

        let report = engine.arrange_windows_on_all_surfaces();

        assert_eq!(
            report.failed,
            vec![(surface(1, 1), EngineError::NoLayout(surface(1, 1)))]
        );
        assert_eq!(report.arranged, vec![surface(1, 0), surface(2, 0), surface(2, 1)]);
        assert_eq!(called_surfaces(&engine), report.arranged);
    }

    #[test]
    fn workspace_failures_are_isolated_too() {
        let mut engine = engine(1, 1);
        let report = engine.arrange_windows_on_surfaces(&[surface(1, 4), surface(1, 0)]);

        assert_eq!(
            report.failed,
            vec![(surface(1, 4), EngineError::InvalidScreen { screen: 4, screen_count: 1 })]
        );
        assert_eq!(report.arranged, vec![surface(1, 0)]);
    }

    #[test]
    fn floating_windows_are_not_tiled() {
        let mut engine = engine(1, 1);
        let a = window("a");
        let b = window("b");
        add_all(&mut engine, &[&a, &b]);
        assert_eq!(engine.windows_mut().toggle_floating(&a), Some(true));

        engine.arrange_windows_on_surface(&surface(1, 0)).unwrap();

        assert_eq!(calls(&engine)[0].windows, vec!["b".to_string()]);
    }
}

mod focus {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    fn three(engine: &mut TestEngine) -> (SimWindow, SimWindow, SimWindow) {
        let (a, b, c) = (window("a"), window("b"), window("c"));
        add_all(engine, &[&a, &b, &c]);
        (a, b, c)
    }

    #[test]
    fn next_wraps_to_first() {
        let mut engine = engine(1, 1);
        let (a, _, c) = three(&mut engine);
        engine.windows_mut().set_active(Some(c));

        assert_eq!(engine.focus_window(RelDirection::Next), Some(a.clone()));
        assert_eq!(a.activations(), 1);
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut engine = engine(1, 1);
        let (a, _, c) = three(&mut engine);
        engine.windows_mut().set_active(Some(a));

        assert_eq!(engine.focus_window(RelDirection::Previous), Some(c.clone()));
        assert_eq!(c.activations(), 1);
    }

    #[test]
    fn moves_one_step_in_the_middle() {
        let mut engine = engine(1, 1);
        let (a, b, c) = three(&mut engine);
        engine.windows_mut().set_active(Some(b));

        assert_eq!(engine.focus_window(RelDirection::Next), Some(c));
        assert_eq!(engine.focus_window(RelDirection::Previous), Some(a));
    }

    #[test]
    fn without_active_window_first_candidate_is_focused() {
        let mut engine = engine(1, 1);
        let (a, b) = (window("a"), window("b"));
        add_all(&mut engine, &[&a, &b]);

        assert_eq!(engine.focus_window(RelDirection::Next), Some(a.clone()));
        assert_eq!(engine.focus_window(RelDirection::Previous), Some(a.clone()));
        assert_eq!(a.activations(), 2);
        assert_eq!(b.activations(), 0);
    }

    #[test]
    fn single_candidate_refocuses_itself() {
        let mut engine = engine(1, 1);
        let a = window("a");
        add_all(&mut engine, &[&a]);
        engine.windows_mut().set_active(Some(a.clone()));

        assert_eq!(engine.focus_window(RelDirection::Next), Some(a.clone()));
        assert_eq!(engine.focus_window(RelDirection::Previous), Some(a.clone()));
        assert_eq!(a.activations(), 2);
    }

    #[test]
    fn no_candidates_is_a_no_op() {
        let mut engine = engine(2, 1);
        let elsewhere = SimWindow::new(WindowSpec {
            caption: "elsewhere".into(),
            desktops: vec![2],
            ..WindowSpec::default()
        });
        add_all(&mut engine, &[&elsewhere]);

        assert_eq!(engine.focus_window(RelDirection::Next), None);
        assert_eq!(elsewhere.activations(), 0);
    }

    #[test]
    fn stale_active_window_is_a_no_op() {
        let mut engine = engine(2, 1);
        let a = window("a");
        let elsewhere = SimWindow::new(WindowSpec {
            caption: "elsewhere".into(),
            desktops: vec![2],
            ..WindowSpec::default()
        });
        add_all(&mut engine, &[&a, &elsewhere]);
        engine.windows_mut().set_active(Some(elsewhere.clone()));

        assert_eq!(engine.focus_window(RelDirection::Next), None);
        assert_eq!(a.activations(), 0);
        assert_eq!(elsewhere.activations(), 0);
    }

    #[test]
    fn candidates_come_from_the_active_screen() {
        let mut engine = engine(1, 2);
        let left = window("left");
        let right = SimWindow::new(WindowSpec {
            caption: "right".into(),
            screen: 1,
            ..WindowSpec::default()
        });
        add_all(&mut engine, &[&left, &right]);
        engine.workspace_mut().active_screen = 1;

        assert_eq!(engine.focus_window(RelDirection::Next), Some(right));
        assert_eq!(left.activations(), 0);
    }
}

mod commands {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn focus_commands_report_the_activated_window() {
        let mut engine = engine(1, 1);
        let (a, b) = (window("a"), window("b"));
        add_all(&mut engine, &[&a, &b]);
        engine.windows_mut().set_active(Some(a));

        let response = engine.handle_command(&LayoutCommand::FocusNext);
        assert_eq!(response.focus_window, Some(b));
        assert_eq!(response.arranged, None);
        assert!(calls(&engine).is_empty());
    }

    #[test]
    fn layout_changes_rearrange_the_active_surface() {
        let mut engine = engine(2, 2);
        engine.workspace_mut().active_screen = 1;

        let response = engine.handle_command(&LayoutCommand::IncreaseMasterCount);

        let report = response.arranged.expect("active surface was arranged");
        assert_eq!(report.arranged, vec![surface(1, 1)]);
        assert_eq!(called_surfaces(&engine), vec![surface(1, 1)]);
    }

    #[test]
    fn unchanged_layouts_are_left_alone() {
        let mut engine = engine(1, 1);

        let response = engine.handle_command(&LayoutCommand::NextLayout);
        assert_eq!(response, CommandResponse::default());
        let response = engine.handle_command(&LayoutCommand::DecreaseMasterRatio);
        assert_eq!(response, CommandResponse::default());
        assert!(calls(&engine).is_empty());
    }

    #[test]
    fn failing_layout_lookup_is_swallowed() {
        let mut engine = engine(1, 1);
        engine.layouts_mut().failing.insert(surface(1, 0));

        let response = engine.handle_command(&LayoutCommand::IncreaseMasterCount);
        assert_eq!(response, CommandResponse::default());
    }
}

#[test]
fn shared_engine_serialises_access() {
    let shared = engine(1, 1).into_shared();
    let a = window("a");

    assert!(shared.lock().add_window(a.clone()).is_admitted());
    assert_eq!(shared.lock().focus_window(RelDirection::Next), Some(a));
}
