#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::game::SPAWN_X;
    use crate::shapes::PieceKind;
    use crate::spawner::Spawner;

    #[test]
    fn test_spawn_pose() {
        for kind in PieceKind::ALL {
            let piece = Spawner::spawn(kind);
            assert_eq!(piece.kind, kind);
            assert_eq!(piece.rotation, 0);
            assert_eq!(piece.x, SPAWN_X);

            // Topmost filled cell sits on row 0
            let top = piece.blocks().map(|(_, y)| y).min().unwrap();
            assert_eq!(top, 0, "{kind:?} should enter with its top on row 0");
        }
    }

    #[test]
    fn test_rotate_advances_modulo_four() {
        for kind in PieceKind::ALL {
            let spawned = Spawner::spawn(kind);
            let mut piece = spawned;
            for expected in [1, 2, 3, 0] {
                piece = Spawner::rotate(piece);
                assert_eq!(piece.rotation, expected, "{kind:?}");
                assert_eq!(
                    kind.bitmap(piece.rotation),
                    &kind.rotations()[expected],
                    "{kind:?} rotation {expected}"
                );
            }
            assert_eq!(piece, spawned, "{kind:?} should return to its spawn pose");
            assert_eq!(kind.bitmap(piece.rotation), kind.bitmap(0));
        }
    }

    #[test]
    fn test_rotate_keeps_position() {
        let piece = Spawner::spawn(PieceKind::L).shifted(2, 5);
        let rotated = Spawner::rotate(piece);
        assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));
        assert_eq!(rotated.kind, piece.kind);
    }

    #[test]
    fn test_seeded_spawners_agree() {
        let mut a = Spawner::with_seed(7);
        let mut b = Spawner::with_seed(7);
        for _ in 0..50 {
            assert_eq!(a.random_kind(), b.random_kind());
        }
    }

    #[test]
    fn test_random_kind_covers_all_kinds() {
        let mut spawner = Spawner::with_seed(1234);
        let seen: HashSet<_> = (0..1000).map(|_| spawner.random_kind()).collect();
        assert_eq!(seen.len(), PieceKind::ALL.len());
    }
}
