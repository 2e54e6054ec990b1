//! Named views over six-slot parameter windows.
//!
//! Every page of machine, LFO, AMP and FX parameters is six bytes wide. The
//! structs declared here name the positions that carry meaning for one page
//! variant. `T` is `u8` for part values and `Option<u8>` for parameter locks.

/// Declare a struct naming positions in a six-slot parameter window.
macro_rules! param_window {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$fmeta:meta])* $field:ident: $idx:literal),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
        pub struct $name<T> {
            $($(#[$fmeta])* pub $field: T,)*
        }

        impl<T: Copy> $name<T> {
            /// Window positions carrying a named field.
            pub const POSITIONS: &'static [usize] = &[$($idx),*];

            pub fn from_window(window: &[T; 6]) -> Self {
                Self { $($field: window[$idx],)* }
            }

            /// Write the named fields. Unnamed positions are left untouched.
            pub fn write_window(&self, window: &mut [T; 6]) {
                $(window[$idx] = self.$field;)*
            }
        }
    };
}

param_window!(
    /// LFO page: three speeds then three depths.
    LfoParams {
        speed1: 0,
        speed2: 1,
        speed3: 2,
        depth1: 3,
        depth2: 4,
        depth3: 5,
    }
);

param_window!(
    /// Amplitude envelope page. Position 5 is reserved.
    AmpParams {
        attack: 0,
        hold: 1,
        release: 2,
        volume: 3,
        /// 64 = center
        balance: 4,
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amp_leaves_reserved_position() {
        let mut window = [9u8; 6];
        let amp = AmpParams { attack: 0, hold: 127, release: 24, volume: 108, balance: 64 };
        amp.write_window(&mut window);
        assert_eq!(window, [0, 127, 24, 108, 64, 9]);
        assert_eq!(AmpParams::from_window(&window), amp);
        assert_eq!(AmpParams::<u8>::POSITIONS, &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn lfo_with_locks() {
        let window = [Some(10), None, None, Some(3), None, None];
        let lfo = LfoParams::from_window(&window);
        assert_eq!(lfo.speed1, Some(10));
        assert_eq!(lfo.depth1, Some(3));
        assert_eq!(lfo.speed2, None);
    }
}
