use eframe_whiteboard::dialogs::{TextPrompt, TextRequest};
use eframe_whiteboard::interpreter::{step, Gesture, InterpreterConfig};
use eframe_whiteboard::renderer::{render, RenderStyle};
use eframe_whiteboard::{
    CircleMode, Command, Document, DrawCommand, PointerEvent, ToolKind, ToolState, WhiteboardApp,
};
use egui::{Color32, Pos2, Vec2};

/// Answers every prompt with a fixed reply and remembers what was asked
struct ScriptedPrompt {
    reply: Option<String>,
    requests: Vec<TextRequest>,
}

impl ScriptedPrompt {
    fn replying(reply: Option<&str>) -> Self {
        Self {
            reply: reply.map(str::to_owned),
            requests: Vec::new(),
        }
    }
}

impl TextPrompt for ScriptedPrompt {
    fn request_text(&mut self, request: &TextRequest) -> Option<String> {
        self.requests.push(request.clone());
        self.reply.clone()
    }
}

fn gesture(
    tool: &ToolState,
    config: &InterpreterConfig,
    events: &[PointerEvent],
    prompt: &mut ScriptedPrompt,
) -> (Gesture, Vec<DrawCommand>) {
    let mut state = Gesture::Idle;
    let mut commands = Vec::new();
    for event in events {
        let step = step(state, tool, config, *event, prompt);
        state = step.gesture;
        commands.extend(step.commands);
    }
    (state, commands)
}

fn press_release(kind: ToolKind, from: Pos2, to: Pos2) -> Vec<DrawCommand> {
    let tool = ToolState::new(kind, Color32::BLUE, 3.0);
    let (state, commands) = gesture(
        &tool,
        &InterpreterConfig::default(),
        &[PointerEvent::Press(from), PointerEvent::Release(to)],
        &mut ScriptedPrompt::replying(None),
    );
    assert_eq!(state, Gesture::Idle);
    commands
}

#[test]
fn test_degenerate_gestures_commit_zero_size_shapes() {
    let p = Pos2::new(42.0, 17.0);

    assert_eq!(
        press_release(ToolKind::Line, p, p),
        vec![DrawCommand::Line {
            from: p,
            to: p,
            color: Color32::BLUE,
            width: 3.0,
        }]
    );

    match press_release(ToolKind::Rectangle, p, p).as_slice() {
        [DrawCommand::Rectangle { rect, .. }] => {
            assert_eq!(rect.min, p);
            assert_eq!(rect.size(), Vec2::ZERO);
        }
        other => panic!("expected one rectangle, got {other:?}"),
    }

    match press_release(ToolKind::Circle, p, p).as_slice() {
        [DrawCommand::Ellipse { center, radius, .. }] => {
            assert_eq!(*center, p);
            assert_eq!(*radius, Vec2::ZERO);
        }
        other => panic!("expected one ellipse, got {other:?}"),
    }

    // Freehand tools commit only on drag
    assert!(press_release(ToolKind::Pencil, p, p).is_empty());
    assert!(press_release(ToolKind::Eraser, p, p).is_empty());
}

#[test]
fn test_degenerate_shapes_render_without_error() {
    let p = Pos2::new(10.0, 10.0);
    let mut doc = Document::new();
    for kind in [ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle] {
        doc.extend(press_release(kind, p, p));
    }
    let style = RenderStyle {
        background: Color32::WHITE,
        grid: None,
    };
    assert!(render(&doc, [32, 32], &style, None).is_ok());
}

#[test]
fn test_rectangle_normalized_in_every_direction() {
    let origin = Pos2::new(100.0, 100.0);
    let offsets = [
        Vec2::new(30.0, 20.0),
        Vec2::new(-30.0, 20.0),
        Vec2::new(30.0, -20.0),
        Vec2::new(-30.0, -20.0),
        Vec2::new(0.0, -5.5),
    ];
    for offset in offsets {
        let release = origin + offset;
        match press_release(ToolKind::Rectangle, origin, release).as_slice() {
            [DrawCommand::Rectangle { rect, .. }] => {
                assert_eq!(rect.min, Pos2::new(origin.x.min(release.x), origin.y.min(release.y)));
                assert_eq!(rect.width(), offset.x.abs());
                assert_eq!(rect.height(), offset.y.abs());
            }
            other => panic!("expected one rectangle, got {other:?}"),
        }
    }
}

#[test]
fn test_pencil_polyline_visits_points_in_order() {
    let tool = ToolState::new(ToolKind::Pencil, Color32::BLACK, 2.0);
    let start = Pos2::new(5.0, 5.0);
    let points: Vec<Pos2> = (1..=6)
        .map(|i| Pos2::new(5.0 + i as f32 * 7.0, 5.0 + (i * i) as f32))
        .collect();

    let mut events = vec![PointerEvent::Press(start)];
    events.extend(points.iter().map(|p| PointerEvent::Drag(*p)));
    events.push(PointerEvent::Release(*points.last().unwrap()));

    let mut prompt = ScriptedPrompt::replying(None);
    let (_, commands) = gesture(&tool, &InterpreterConfig::default(), &events, &mut prompt);
    assert_eq!(commands.len(), points.len());

    let mut expected_from = start;
    for (command, point) in commands.iter().zip(&points) {
        match command {
            DrawCommand::Segment { from, to, .. } => {
                assert_eq!(*from, expected_from);
                assert_eq!(to, point);
                expected_from = *to;
            }
            other => panic!("expected a segment, got {other:?}"),
        }
    }
}

#[test]
fn test_eraser_leaves_stroke_color_alone() {
    let mut app = WhiteboardApp::default();
    app.execute_command(Command::SetColor(Color32::RED));
    app.execute_command(Command::SetBrushWidth(5.0));
    app.execute_command(Command::SetTool(ToolKind::Eraser));

    app.handle_pointer(PointerEvent::Press(Pos2::new(0.0, 0.0)));
    app.handle_pointer(PointerEvent::Drag(Pos2::new(10.0, 0.0)));
    app.handle_pointer(PointerEvent::Drag(Pos2::new(20.0, 5.0)));
    app.handle_pointer(PointerEvent::Release(Pos2::new(20.0, 5.0)));

    assert_eq!(app.tool().stroke_color, Color32::RED);
    assert_eq!(app.document().len(), 2);
    assert!(app
        .document()
        .commands()
        .iter()
        .all(|c| matches!(c, DrawCommand::Erase { width, .. } if *width == 10.0)));

    // Switching back to the pencil draws in the color chosen before erasing
    app.execute_command(Command::SetTool(ToolKind::Pencil));
    app.handle_pointer(PointerEvent::Press(Pos2::new(0.0, 20.0)));
    app.handle_pointer(PointerEvent::Drag(Pos2::new(30.0, 20.0)));
    app.handle_pointer(PointerEvent::Release(Pos2::new(30.0, 20.0)));

    assert!(matches!(
        app.document().commands().last(),
        Some(DrawCommand::Segment { color, .. }) if *color == Color32::RED
    ));
}

#[test]
fn test_eraser_width_follows_configured_factor() {
    let tool = ToolState::new(ToolKind::Eraser, Color32::RED, 5.0);
    let config = InterpreterConfig {
        eraser_factor: 3.0,
        ..InterpreterConfig::default()
    };
    let (_, commands) = gesture(
        &tool,
        &config,
        &[
            PointerEvent::Press(Pos2::new(0.0, 0.0)),
            PointerEvent::Drag(Pos2::new(10.0, 0.0)),
            PointerEvent::Release(Pos2::new(10.0, 0.0)),
        ],
        &mut ScriptedPrompt::replying(None),
    );

    assert!(matches!(
        commands.as_slice(),
        [DrawCommand::Erase { width, .. }] if *width == 15.0
    ));
}

#[test]
fn test_text_placed_at_press_point() {
    let tool = ToolState::new(ToolKind::Text, Color32::BLACK, 4.0);
    let mut prompt = ScriptedPrompt::replying(Some("hi"));
    let step = step(
        Gesture::Idle,
        &tool,
        &InterpreterConfig::default(),
        PointerEvent::Press(Pos2::new(50.0, 50.0)),
        &mut prompt,
    );

    // Text is a single-click action
    assert_eq!(step.gesture, Gesture::Idle);
    assert_eq!(prompt.requests.len(), 1);
    assert_eq!(
        step.commands,
        vec![DrawCommand::Text {
            origin: Pos2::new(50.0, 50.0),
            text: "hi".to_owned(),
            color: Color32::BLACK,
            size: 12.0,
        }]
    );
}

#[test]
fn test_empty_text_leaves_surface_identical() {
    let style = RenderStyle {
        background: Color32::WHITE,
        grid: None,
    };
    let mut doc = Document::new();
    doc.push(DrawCommand::Line {
        from: Pos2::new(0.0, 0.0),
        to: Pos2::new(60.0, 60.0),
        color: Color32::BLACK,
        width: 2.0,
    });
    let before = render(&doc, [80, 80], &style, None).unwrap();

    let tool = ToolState::new(ToolKind::Text, Color32::BLACK, 4.0);
    for reply in [Some(""), Some("   "), None] {
        let mut prompt = ScriptedPrompt::replying(reply);
        let (state, commands) = gesture(
            &tool,
            &InterpreterConfig::default(),
            &[PointerEvent::Press(Pos2::new(50.0, 50.0))],
            &mut prompt,
        );
        assert_eq!(state, Gesture::Idle);
        assert!(commands.is_empty());
        doc.extend(commands);
    }

    let after = render(&doc, [80, 80], &style, None).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_circle_modes() {
    let tool = ToolState::new(ToolKind::Circle, Color32::GREEN, 1.0);
    let events = [
        PointerEvent::Press(Pos2::new(0.0, 0.0)),
        PointerEvent::Drag(Pos2::new(10.0, 10.0)),
        PointerEvent::Release(Pos2::new(30.0, 40.0)),
    ];

    let bbox = InterpreterConfig {
        circle_mode: CircleMode::BoundingBox,
        ..InterpreterConfig::default()
    };
    let (_, commands) = gesture(&tool, &bbox, &events, &mut ScriptedPrompt::replying(None));
    assert!(matches!(
        commands.as_slice(),
        [DrawCommand::Ellipse { center, radius, .. }]
            if *center == Pos2::new(15.0, 20.0) && *radius == Vec2::new(15.0, 20.0)
    ));

    let centered = InterpreterConfig {
        circle_mode: CircleMode::CenterRadius,
        ..InterpreterConfig::default()
    };
    let (_, commands) = gesture(&tool, &centered, &events, &mut ScriptedPrompt::replying(None));
    assert!(matches!(
        commands.as_slice(),
        [DrawCommand::Ellipse { center, radius, .. }]
            if *center == Pos2::ZERO && *radius == Vec2::splat(50.0)
    ));
}
