use seamkit_toolpath::{
    ConcentricPrintGenerator, GcodeFormatter, MotionTag, PrintParameters, ProgramLine,
};

fn small_print() -> PrintParameters {
    PrintParameters {
        ring_count: 2,
        vertex_count: 24,
        figure_height: 1.0,
        seam_length_internal: 15.0,
        seam_length_external: 25.0,
        ..PrintParameters::default()
    }
}

fn literals(lines: &[ProgramLine]) -> Vec<&str> {
    lines
        .iter()
        .filter_map(|line| match line {
            ProgramLine::Literal(text) => Some(text.as_str()),
            ProgramLine::Motion(_) => None,
        })
        .collect()
}

#[test]
fn test_program_bracketed_by_literals() {
    let program = ConcentricPrintGenerator::new(small_print())
        .generate()
        .unwrap();
    let lines = program.lines();

    assert_eq!(
        lines[0],
        ProgramLine::Literal("START_PRINT BED_TEMP=80 EXTRUDER_TEMP=240".to_string())
    );
    assert_eq!(lines[1], ProgramLine::Literal("M83".to_string()));
    assert_eq!(lines[2], ProgramLine::Literal("M106 S40".to_string()));
    assert_eq!(
        lines.last(),
        Some(&ProgramLine::Literal("END_PRINT".to_string()))
    );
    assert_eq!(
        literals(lines),
        vec![
            "START_PRINT BED_TEMP=80 EXTRUDER_TEMP=240",
            "M83",
            "M106 S40",
            "M106 S128",
            "END_PRINT"
        ]
    );
}

#[test]
fn test_one_layer_per_ring_per_height() {
    let params = small_print();
    let floors = params.layer_floors();
    // 0.3, 0.6, 0.9
    assert_eq!(floors.len(), 3);

    let program = ConcentricPrintGenerator::new(params).generate().unwrap();
    let retracts = program
        .motions()
        .filter(|m| m.tag() == Some(MotionTag::Retract))
        .count();
    assert_eq!(retracts, 2 * (1 + floors.len()));
}

#[test]
fn test_fan_change_after_first_layer() {
    let program = ConcentricPrintGenerator::new(small_print())
        .generate()
        .unwrap();
    let lines = program.lines();
    let fan = lines
        .iter()
        .position(|l| *l == ProgramLine::Literal("M106 S128".to_string()))
        .unwrap();

    // Everything before the fan change is the first layer at 0.3
    let first_layer_tops: Vec<f64> = lines[..fan]
        .iter()
        .filter_map(|l| match l {
            ProgramLine::Motion(m) if m.is_printing() => m.z(),
            _ => None,
        })
        .collect();
    assert!(!first_layer_tops.is_empty());
    assert!(first_layer_tops.iter().all(|z| *z == 0.3));

    // First layer printed at first-layer speed, later layers faster
    let first_feed = lines[..fan].iter().find_map(|l| match l {
        ProgramLine::Motion(m) if m.is_printing() => m.feed_rate(),
        _ => None,
    });
    let later_feed = lines[fan..].iter().find_map(|l| match l {
        ProgramLine::Motion(m) if m.is_printing() => m.feed_rate(),
        _ => None,
    });
    assert_eq!(first_feed, Some(1200.0));
    assert_eq!(later_feed, Some(3000.0));
}

#[test]
fn test_exterior_ring_printed_last_each_layer() {
    let params = PrintParameters {
        speed_external: 30.0,
        ..small_print()
    };
    let program = ConcentricPrintGenerator::new(params).generate().unwrap();
    let text = program.render(&GcodeFormatter::new());
    let body = text.split("M106 S128\n").nth(1).unwrap();

    let last_print = body
        .lines()
        .filter(|l| l.ends_with(";finish_seam"))
        .last()
        .unwrap();
    assert!(last_print.contains(" F1800 "));
}

#[test]
fn test_save_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rings.gcode");

    let program = ConcentricPrintGenerator::new(small_print())
        .generate()
        .unwrap();
    program
        .save_to_file(&path, &GcodeFormatter::with_precision(4))
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), program.len());
    assert!(content.starts_with("START_PRINT"));
    assert!(content.ends_with("END_PRINT\n"));
    assert!(content.contains("G1 E-0.5000 ;retract"));
}

#[test]
fn test_invalid_parameters_abort() {
    let params = PrintParameters {
        filament_diameter: 0.0,
        ..small_print()
    };
    let err = ConcentricPrintGenerator::new(params).generate().unwrap_err();
    assert!(err.is_precondition_error());

    let params = PrintParameters {
        base_radius: -5.0,
        ..small_print()
    };
    assert!(ConcentricPrintGenerator::new(params).generate().is_err());
}
