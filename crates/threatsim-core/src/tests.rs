#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::catalog::{drone_spec, weapon_spec};
    use crate::commands::PlayerCommand;
    use crate::components::{Health, PositionHistory, ThreatInfo};
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::FeedEntry;
    use crate::state::GameStateSnapshot;
    use crate::synergy::{builtin_synergies, SynergyBonus, SynergyDefinition};
    use crate::types::{Position, Rect, SimTime, Velocity};

    #[test]
    fn test_weapon_kind_serde() {
        for v in WeaponKind::ALL {
            let json = serde_json::to_string(&v).unwrap();
            assert_eq!(json, format!("\"{}\"", v.as_str()));
            let back: WeaponKind = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_drone_role_serde() {
        for v in DroneRole::ALL {
            let json = serde_json::to_string(&v).unwrap();
            let back: DroneRole = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_weapon_kind_from_str() {
        assert_eq!("rf-takeover".parse::<WeaponKind>().unwrap(), WeaponKind::RfTakeover);
        assert_eq!(" HPM ".parse::<WeaponKind>().unwrap(), WeaponKind::Hpm);
        match "railgun".parse::<WeaponKind>() {
            Err(ConfigError::UnknownEffector(name)) => assert_eq!(name, "railgun"),
            other => panic!("expected UnknownEffector, got {other:?}"),
        }
    }

    #[test]
    fn test_drone_role_from_str_rejects_unknown() {
        assert_eq!("ECM".parse::<DroneRole>().unwrap(), DroneRole::Ecm);
        assert!(matches!(
            "bomber".parse::<DroneRole>(),
            Err(ConfigError::UnknownDroneRole(_))
        ));
    }

    #[test]
    fn test_hotkeys_are_unique() {
        for a in WeaponKind::ALL {
            assert_eq!(WeaponKind::from_hotkey(a.hotkey()), Some(a));
            let clashes = WeaponKind::ALL.iter().filter(|b| b.hotkey() == a.hotkey()).count();
            assert_eq!(clashes, 1, "hotkey {} is shared", a.hotkey());
        }
        assert_eq!(WeaponKind::from_hotkey('s'), Some(WeaponKind::SmartSlug));
        assert_eq!(WeaponKind::from_hotkey('z'), None);
    }

    #[test]
    fn test_roster_stats_are_positive() {
        for kind in WeaponKind::ALL {
            let spec = weapon_spec(kind);
            assert_eq!(spec.kind, kind);
            assert!(spec.cooldown_ms > 0.0);
            assert!(spec.energy_cost > 0.0);
            assert!(spec.damage > 0.0);
            assert!(spec.range > 0.0);
        }
        assert_eq!(weapon_spec(WeaponKind::Hpm).cooldown_ms, 2_000.0);
        assert_eq!(weapon_spec(WeaponKind::Kinetic).energy_cost, 5.0);
    }

    #[test]
    fn test_drone_specs() {
        for role in DroneRole::ALL {
            let spec = drone_spec(role);
            assert_eq!(spec.role, role);
            assert!(spec.max_concurrent >= 1);
            assert!(spec.deploy_cost > 0.0);
        }
    }

    #[test]
    fn test_threat_status_transitions() {
        use ThreatStatus::*;
        assert!(Active.can_transition_to(Neutralized));
        assert!(Active.can_transition_to(Crater));
        for from in [Neutralized, Crater] {
            for to in [Active, Neutralized, Crater] {
                assert!(!from.can_transition_to(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn test_threat_info_neutralize_once() {
        let mut info = ThreatInfo::new(1, ThreatKind::SingleDrone, 0.0);
        assert!(info.neutralize(500.0));
        assert_eq!(info.fade_start_ms, Some(500.0));
        // Second neutralization must not restart the fade.
        assert!(!info.neutralize(900.0));
        assert_eq!(info.fade_start_ms, Some(500.0));
        assert!(!info.crater());
        assert_eq!(info.status, ThreatStatus::Neutralized);
    }

    #[test]
    fn test_stealth_starts_hidden() {
        let info = ThreatInfo::new(2, ThreatKind::Stealth, 0.0);
        assert!(!info.revealed);
        assert!(!info.is_targetable());
        assert!(ThreatInfo::new(3, ThreatKind::Kamikaze, 0.0).is_targetable());
    }

    #[test]
    fn test_health_rejects_invalid() {
        assert!(Health::new(50.0).is_ok());
        assert!(matches!(
            Health::with_current(-1.0, 50.0),
            Err(ConfigError::InvalidHealth { .. })
        ));
        assert!(Health::with_current(60.0, 50.0).is_err());
        assert!(Health::new(0.0).is_err());
        assert!(Health::new(f64::NAN).is_err());
    }

    #[test]
    fn test_health_depletes_once() {
        let mut h = Health::new(30.0).unwrap();
        assert!(!h.apply_damage(20.0));
        assert!(h.apply_damage(20.0));
        assert_eq!(h.current, 0.0);
        assert!(!h.apply_damage(5.0));
    }

    #[test]
    fn test_trail_evicts_oldest() {
        let mut trail = PositionHistory::with_capacity(3);
        for i in 0..5 {
            trail.record(Position::planar(i as f64, 0.0));
        }
        let xs: Vec<f64> = trail.positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_builtin_synergy_table_order() {
        let ids: Vec<String> = builtin_synergies().into_iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "gnss_rf_combo",
                "optical_net_combo",
                "kinetic_laser_combo",
                "decoy_capture",
                "electronic_dominance",
                "ai_deception_combo",
            ]
        );
    }

    #[test]
    fn test_synergy_definition_resolves() {
        let def: SynergyDefinition = serde_json::from_str(
            r#"{"id":"x","name":"X","effectors":["kinetic","smart-slug"],"bonus":{"damage":0.5}}"#,
        )
        .unwrap();
        let effect = def.resolve().unwrap();
        assert!(effect.required.contains(&WeaponKind::SmartSlug));
        assert_eq!(effect.bonus.damage, Some(0.5));
        assert_eq!(effect.bonus.range, None);
    }

    #[test]
    fn test_synergy_definition_unknown_effector() {
        let def = SynergyDefinition {
            id: "bad".into(),
            name: "Bad".into(),
            description: String::new(),
            effectors: vec!["kinetic".into(), "photon_torpedo".into()],
            bonus: SynergyBonus::default(),
            visual_effect: String::new(),
            color: String::new(),
        };
        match def.resolve() {
            Err(ConfigError::UnknownSynergyEffector { synergy, effector }) => {
                assert_eq!(synergy, "bad");
                assert_eq!(effector, "photon_torpedo");
            }
            other => panic!("expected UnknownSynergyEffector, got {other:?}"),
        }
    }

    #[test]
    fn test_synergy_bonus_out_of_range() {
        let def = SynergyDefinition {
            id: "greedy".into(),
            name: "Greedy".into(),
            description: String::new(),
            effectors: vec!["laser".into()],
            bonus: SynergyBonus {
                cooldown: Some(1.5),
                ..Default::default()
            },
            visual_effect: String::new(),
            color: String::new(),
        };
        assert!(matches!(
            def.resolve(),
            Err(ConfigError::BonusOutOfRange { field: "cooldown", .. })
        ));
    }

    #[test]
    fn test_config_error_messages_name_the_effector() {
        let dup = ConfigError::DuplicateLoadoutEntry(WeaponKind::Laser).to_string();
        assert_eq!(dup, "effector `Laser` appears twice in the initial loadout");
        let unknown = ConfigError::UnknownEffector("plasma".into()).to_string();
        assert!(unknown.contains("plasma"));
    }

    #[test]
    fn test_bonus_combine() {
        let a = SynergyBonus {
            damage: Some(0.3),
            range: Some(0.1),
            ..Default::default()
        };
        let b = SynergyBonus {
            range: Some(0.2),
            cooldown: Some(0.15),
            ..Default::default()
        };
        let sum = a.combine(&b);
        assert_eq!(sum.damage, Some(0.3));
        assert!((sum.range.unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(sum.cooldown, Some(0.15));
        assert_eq!(sum.accuracy, None);
    }

    /// PlayerCommand is a tagged union; check the wire shape of a few variants.
    #[test]
    fn test_player_command_serde() {
        let commands = vec![
            PlayerCommand::StartMission,
            PlayerCommand::Fire { x: 10.0, y: -5.0 },
            PlayerCommand::FireAt { threat_id: 4 },
            PlayerCommand::DeployDrone {
                role: DroneRole::Ecm,
                x: 100.0,
                y: 0.0,
            },
            PlayerCommand::SelectThreat {
                threat_id: 9,
                additive: true,
            },
            PlayerCommand::SetSelectionBox {
                rect: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            },
            PlayerCommand::SetSelectionBox { rect: None },
            PlayerCommand::SetPriority {
                threat_id: 9,
                level: PriorityLevel::High,
            },
            PlayerCommand::SwitchWeapon {
                kind: WeaponKind::Laser,
            },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(*cmd, back);
        }

        let parsed: PlayerCommand =
            serde_json::from_str(r#"{"type":"DeployDrone","role":"guard","x":1.0,"y":2.0}"#).unwrap();
        assert_eq!(
            parsed,
            PlayerCommand::DeployDrone {
                role: DroneRole::Guard,
                x: 1.0,
                y: 2.0
            }
        );
    }

    #[test]
    fn test_feed_entry_serde() {
        let entry = FeedEntry {
            seq: 12,
            time_ms: 1500.0,
            severity: Severity::Critical,
            message: "Impact on defended asset".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"critical\""));
        let back: FeedEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = GameStateSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert_eq!(snapshot.phase, back.phase);
        assert!(
            json.len() < 2048,
            "Empty snapshot should be <2KB, was {} bytes",
            json.len()
        );
    }

    #[test]
    fn test_position_bearing() {
        let origin = Position::new(0.0, 0.0, 0.0);
        let north = Position::new(0.0, 100.0, 0.0);
        assert!((origin.bearing_to(&north) - 0.0).abs() < 1e-10);
        let east = Position::new(100.0, 0.0, 0.0);
        assert!((origin.bearing_to(&east) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert!((a.horizontal_range_to(&b) - 5.0).abs() < 1e-10);
        assert!((a.range_to(&b) - 13.0).abs() < 1e-10);
    }

    #[test]
    fn test_velocity_heading() {
        let east = Velocity::new(10.0, 0.0, 0.0);
        assert!((east.heading() - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
        assert!((Velocity::new(3.0, 4.0, 0.0).speed() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rect_contains_any_corner_order() {
        let r = Rect::new(10.0, 10.0, -10.0, -10.0);
        assert!(r.contains(&Position::new(0.0, 0.0, 80.0)));
        assert!(r.contains(&Position::planar(10.0, -10.0)));
        assert!(!r.contains(&Position::planar(10.1, 0.0)));
    }

    #[test]
    fn test_sim_time_clamps_large_gaps() {
        let mut time = SimTime::default();
        time.advance_to(16.0);
        assert!((time.dt_secs - 0.016).abs() < 1e-12);
        time.advance_to(5_016.0);
        assert!((time.dt_secs - 0.1).abs() < 1e-12);
        assert_eq!(time.now_ms, 5_016.0);
        // Clock never runs backwards.
        time.advance_to(100.0);
        assert_eq!(time.dt_secs, 0.0);
        assert_eq!(time.now_ms, 5_016.0);
        assert_eq!(time.tick, 3);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(max in 1.0f64..500.0, hits in prop::collection::vec(-50.0f64..200.0, 0..20)) {
            let mut h = Health::new(max).unwrap();
            for hit in hits {
                h.apply_damage(hit);
                prop_assert!(h.current >= 0.0 && h.current <= h.max);
            }
        }

        #[test]
        fn prop_trail_never_exceeds_capacity(cap in 0usize..32, n in 0usize..100) {
            let mut trail = PositionHistory::with_capacity(cap);
            for i in 0..n {
                trail.record(Position::planar(i as f64, 0.0));
            }
            prop_assert_eq!(trail.positions.len(), n.min(cap));
            if n > 0 && cap > 0 {
                prop_assert_eq!(trail.positions.back().map(|p| p.x), Some((n - 1) as f64));
            }
        }
    }
}
