//! End-to-end replay: play files on disk, through the catalog and the
//! scheduler, down to the simulated drive.

use std::{
    fs,
    path::Path,
    time::{Duration, Instant},
};

use approx::assert_relative_eq;
use playbook::{
    auton::playlist::PlayList,
    config::Config,
    fs::calibration::Calibration,
    motion::{manager::{MotionController, MotionMode}, pid::PidGains},
    peripherals::mock::{MockRobot, Plant},
};

fn write_plays(dir: &Path) {
    fs::write(
        dir.join("square.auto"),
        "#Square\n// two sides\n100, turn, 10\n0, drive, 2\n",
    )
    .unwrap();
    fs::write(dir.join("turns.auto"), "#Turns\n0, turn, 90\n0, drive, 5\n").unwrap();
    fs::write(dir.join("readme.txt"), "#Square\n0, drive, 100\n").unwrap();
}

fn catalog() -> (tempfile::TempDir, PlayList) {
    let dir = tempfile::tempdir().unwrap();
    write_plays(dir.path());
    let plays = PlayList::from_dir(dir.path(), "auto", ',').unwrap();
    (dir, plays)
}

#[test]
fn dead_reckoned_replay_from_files() {
    let (_dir, plays) = catalog();
    let robot = MockRobot::new();
    robot.set_plant(Plant::Linear {
        distance_per_output: 1.0,
        degrees_per_output:  20.0,
    });
    let mut motion = MotionController::new(robot.hardware(), &Config::default(), Calibration::default());

    let started = Instant::now();
    let report = plays
        .play("Square", &mut motion, MotionMode::DeadReckoning)
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));

    assert_eq!(report.executed, 2);
    assert_eq!(report.aborted, 0);
    let mut expected = vec![(0.25, 0.25); 8];
    expected.push((0.0, 0.0));
    expected.extend([(0.25, -0.25), (0.25, -0.25), (0.0, 0.0)]);
    assert_eq!(robot.commands(), expected);
}

#[test]
fn pid_replay_converges() {
    let (_dir, plays) = catalog();
    let robot = MockRobot::new();
    // Positive left output lowers the gyro reading on this robot.
    robot.set_plant(Plant::Linear {
        distance_per_output: 0.2,
        degrees_per_output:  -20.0,
    });
    let config = Config {
        gyro_pid: PidGains::new(0.02, 0.0, 0.0, 0.5),
        encoder_pid: Some(PidGains::new(0.4, 0.0, 0.0, 0.05)),
        drive_speed: 0.5,
        turn_speed: 0.5,
        ..Config::default()
    };
    let mut motion = MotionController::new(robot.hardware(), &config, Calibration::default());

    let report = plays.play("Turns", &mut motion, config.motion_mode()).unwrap();
    assert_eq!(report.executed, 2);
    assert_eq!(report.aborted, 0);
    assert_relative_eq!(robot.average_distance(), 5.0, epsilon = 0.05);
    assert!(
        robot
            .commands()
            .iter()
            .all(|(l, r)| l.abs() <= 0.5 && r.abs() <= 0.5)
    );
    assert_eq!(robot.last_command(), Some((0.0, 0.0)));
}

#[test]
fn unknown_play_never_moves() {
    let (_dir, plays) = catalog();
    let robot = MockRobot::new();
    let mut motion = MotionController::new(robot.hardware(), &Config::default(), Calibration::default());

    assert!(plays.play("Readme", &mut motion, MotionMode::Pid).is_none());
    assert!(robot.commands().is_empty());
}

#[test]
fn disable_aborts_each_remaining_waypoint() {
    let (_dir, plays) = catalog();
    let robot = MockRobot::new();
    robot.set_plant(Plant::Linear {
        distance_per_output: 1.0,
        degrees_per_output:  20.0,
    });
    robot.disable_after_polls(3);
    let mut motion = MotionController::new(robot.hardware(), &Config::default(), Calibration::default());

    let report = plays
        .play("Square", &mut motion, MotionMode::DeadReckoning)
        .unwrap();
    assert_eq!(report.executed, 2);
    assert_eq!(report.aborted, 2);
    assert_eq!(
        robot.commands(),
        vec![(0.25, 0.25), (0.25, 0.25), (0.25, 0.25), (0.0, 0.0), (0.0, 0.0)]
    );
}
