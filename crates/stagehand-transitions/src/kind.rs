use stagehand_core::{Color, Easing};

/// Which way an oriented (flip) transition turns.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    LeftOver,
    #[default]
    RightOver,
    UpOver,
    DownOver,
}

/// Window edge an incoming scene enters from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    /// Swaps scenes on the first tick.
    Plain,
    /// Outgoing scene spins and shrinks away, incoming one spins back in.
    RotoZoom,
    /// Outgoing scene shrinks and jumps off left, incoming jumps in and grows.
    JumpZoom,
    /// Incoming scene moves in over the outgoing one.
    MoveIn(Edge),
    /// Both scenes slide together, the incoming one pushing the other out.
    SlideIn(Edge),
    ShrinkGrow,
    FlipX(Orientation),
    FlipY(Orientation),
    FlipAngular(Orientation),
    ZoomFlipX(Orientation),
    ZoomFlipY(Orientation),
    ZoomFlipAngular(Orientation),
    /// Fades to a solid color, then from it to the incoming scene.
    Fade(Color),
    /// Outgoing scene fades out over the incoming one.
    CrossFade,
}

impl TransitionKind {
    /// Whether the incoming scene paints (and takes touches) above the
    /// outgoing one while the transition runs.
    pub fn in_scene_on_top(&self) -> bool {
        match self {
            TransitionKind::SlideIn(edge) => matches!(edge, Edge::Right | Edge::Bottom),
            TransitionKind::CrossFade => false,
            _ => true,
        }
    }

    pub fn default_easing(&self) -> Easing {
        match self {
            TransitionKind::MoveIn(_) | TransitionKind::SlideIn(_) | TransitionKind::ShrinkGrow => {
                Easing::OutRate(2.0)
            }
            _ => Easing::Linear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransitionKind::Plain => "plain",
            TransitionKind::RotoZoom => "roto-zoom",
            TransitionKind::JumpZoom => "jump-zoom",
            TransitionKind::MoveIn(_) => "move-in",
            TransitionKind::SlideIn(_) => "slide-in",
            TransitionKind::ShrinkGrow => "shrink-grow",
            TransitionKind::FlipX(_) => "flip-x",
            TransitionKind::FlipY(_) => "flip-y",
            TransitionKind::FlipAngular(_) => "flip-angular",
            TransitionKind::ZoomFlipX(_) => "zoom-flip-x",
            TransitionKind::ZoomFlipY(_) => "zoom-flip-y",
            TransitionKind::ZoomFlipAngular(_) => "zoom-flip-angular",
            TransitionKind::Fade(_) => "fade",
            TransitionKind::CrossFade => "cross-fade",
        }
    }
}
