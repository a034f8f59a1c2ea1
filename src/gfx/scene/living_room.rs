//! The furnished room as a scene graph.
//!
//! Every piece hangs off the carpet, so spinning the carpet spins the room.
//! Transforms are in the parent's scaled space: a child inherits the full
//! matrix of its parent, scale included, and the numbers below are tuned to
//! that.

use super::error::SceneError;
use super::graph::{NodeDriver, NodeId, SceneGraph, SceneNode, Surface};
use crate::gfx::resources::TextureId;

/// Where the loaded mesh sits on the table top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentPlacement {
    pub translation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for OrnamentPlacement {
    fn default() -> Self {
        Self {
            translation: [0.0, 1.0, 0.0],
            scale: [0.667, 5.0, 0.4],
        }
    }
}

/// Leg offsets shared by the table and the cabinet
const LEG_CORNERS: [(f32, f32); 4] = [(0.9, 0.9), (-0.9, 0.9), (0.9, -0.9), (-0.9, -0.9)];

/// Builds the room. Draw order follows insertion order.
pub fn build(ornament: &OrnamentPlacement) -> Result<SceneGraph, SceneError> {
    let mut graph = SceneGraph::new();
    let carpet = graph.add_root(
        SceneNode::new("carpet")
            .scale(10.0, 0.1, 10.0)
            .cube(TextureId::Carpet)
            .driven_by(NodeDriver::SceneSpin),
    );

    add_table(&mut graph, carpet, ornament)?;
    add_sofa(
        &mut graph,
        carpet,
        "long sofa",
        SceneNode::new("long sofa back")
            .translate(-0.9, 19.0, 0.0)
            .scale(0.05, 18.0, 0.5),
    )?;
    add_sofa(
        &mut graph,
        carpet,
        "short sofa",
        SceneNode::new("short sofa back")
            .translate(-0.3, 19.0, 0.8)
            .rotate_y(90.0)
            .scale(0.05, 18.0, 0.2),
    )?;
    add_lamp(&mut graph, carpet, "lamp 1", [0.2, 1.0, 0.75])?;
    add_lamp(&mut graph, carpet, "lamp 2", [-0.8, 1.0, -0.8])?;

    graph.add_child(
        carpet,
        SceneNode::new("rug")
            .translate(0.2, 1.0, 0.0)
            .scale(0.25, 1.0, 0.35)
            .cube(TextureId::Rug)
            .driven_by(NodeDriver::RugTurn),
    )?;
    graph.add_child(
        carpet,
        SceneNode::new("bean bag")
            .translate(-0.2, 8.5, -0.7)
            .scale(0.4, 15.0, 0.4)
            .cylinder(TextureId::Wool),
    )?;

    add_cabinet(&mut graph, carpet)?;
    add_speaker(&mut graph, carpet, "speaker 1", -0.7)?;
    add_speaker(&mut graph, carpet, "speaker 2", 0.7)?;

    Ok(graph)
}

fn add_legs(
    graph: &mut SceneGraph,
    parent: NodeId,
    prefix: &str,
    texture: TextureId,
) -> Result<(), SceneError> {
    for (i, (x, z)) in LEG_CORNERS.iter().enumerate() {
        graph.add_child(
            parent,
            SceneNode::new(format!("{prefix} leg {}", i + 1))
                .translate(*x, -5.0, *z)
                .scale(0.1, 4.0, 0.1)
                .cube(texture),
        )?;
    }
    Ok(())
}

fn add_table(
    graph: &mut SceneGraph,
    carpet: NodeId,
    ornament: &OrnamentPlacement,
) -> Result<(), SceneError> {
    let top = graph.add_child(
        carpet,
        SceneNode::new("table top")
            .translate(-0.3, 19.5, 0.0)
            .scale(0.15, 2.0, 0.25)
            .cube(TextureId::Wood),
    )?;
    add_legs(graph, top, "table", TextureId::Wood)?;

    for (name, x, z) in [("coaster 1", 0.6, 0.8), ("coaster 2", -0.6, -0.8)] {
        graph.add_child(
            top,
            SceneNode::new(name)
                .translate(x, 1.3, z)
                .scale(0.4, 0.2, 0.25)
                .cylinder(TextureId::Brass),
        )?;
    }

    let remote = graph.add_child(
        top,
        SceneNode::new("remote")
            .translate(-0.6, 1.3, 0.6)
            .rotate_y(30.0)
            .scale(0.45, 0.3, 0.08)
            .cube(TextureId::Gloss),
    )?;
    graph.add_child(
        remote,
        SceneNode::new("remote button 1")
            .translate(-0.5, 1.0, 0.0)
            .scale(0.3, 0.5, 0.7)
            .cube(TextureId::Plastic),
    )?;
    graph.add_child(
        remote,
        SceneNode::new("remote button 2")
            .translate(0.2, 1.0, 0.0)
            .scale(0.2, 0.5, 0.7)
            .cube(TextureId::Plastic),
    )?;
    graph.add_child(
        remote,
        SceneNode::new("power button")
            .translate(0.8, 1.0, 0.6)
            .scale(0.15, 0.5, 0.8)
            .cylinder(TextureId::PowerButton),
    )?;

    let [tx, ty, tz] = ornament.translation;
    let [sx, sy, sz] = ornament.scale;
    graph.add_child(
        top,
        SceneNode::new("ornament")
            .translate(tx, ty, tz)
            .scale(sx, sy, sz)
            .mesh(),
    )?;
    Ok(())
}

fn add_sofa(
    graph: &mut SceneGraph,
    carpet: NodeId,
    name: &str,
    back: SceneNode,
) -> Result<(), SceneError> {
    let back = graph.add_child(carpet, back.cube(TextureId::Suede))?;
    graph.add_child(
        back,
        SceneNode::new(format!("{name} front"))
            .translate(2.0, -0.6, 0.0)
            .scale(2.5, 0.4, 1.0)
            .cube(TextureId::Suede),
    )?;
    for (i, z) in [-1.1, 1.1].into_iter().enumerate() {
        graph.add_child(
            back,
            SceneNode::new(format!("{name} arm {}", i + 1))
                .translate(1.8, -0.4, z)
                .scale(2.7, 0.6, 0.1)
                .cube(TextureId::Suede),
        )?;
    }
    Ok(())
}

fn add_lamp(
    graph: &mut SceneGraph,
    carpet: NodeId,
    name: &str,
    [x, y, z]: [f32; 3],
) -> Result<(), SceneError> {
    let base = graph.add_child(
        carpet,
        SceneNode::new(format!("{name} base"))
            .translate(x, y, z)
            .scale(0.3, 1.0, 0.3)
            .cylinder(TextureId::Iron),
    )?;
    graph.add_child(
        base,
        SceneNode::new(format!("{name} pole"))
            .translate(0.0, 30.0, 0.0)
            .scale(0.07, 60.0, 0.07)
            .cylinder(TextureId::Iron),
    )?;

    // Four thin panels around the pole; their height follows the animation
    let panels = [
        (0.0, -0.4, 0.4, 0.033),
        (-0.4, 0.0, 0.033, 0.4),
        (0.0, 0.4, 0.4, 0.033),
        (0.4, 0.0, 0.033, 0.4),
    ];
    for (i, (px, pz, sx, sz)) in panels.into_iter().enumerate() {
        graph.add_child(
            base,
            SceneNode::new(format!("{name} shade {}", i + 1))
                .translate(px, 58.0, pz)
                .scale(sx, 7.0, sz)
                .cube(TextureId::Canvas)
                .driven_by(NodeDriver::ShadeSlide),
        )?;
    }
    Ok(())
}

fn add_cabinet(graph: &mut SceneGraph, carpet: NodeId) -> Result<(), SceneError> {
    let top = graph.add_child(
        carpet,
        SceneNode::new("cabinet top")
            .translate(0.8, 19.5, 0.0)
            .scale(0.15, 2.0, 0.5)
            .cube(TextureId::Gloss),
    )?;
    graph.add_child(
        top,
        SceneNode::new("cabinet shelf")
            .translate(0.0, -6.0, 0.0)
            .cube(TextureId::Gloss),
    )?;
    add_legs(graph, top, "cabinet", TextureId::Gloss)?;

    let tv = graph.add_child(
        top,
        SceneNode::new("tv base")
            .translate(0.0, 1.0, 0.0)
            .scale(0.7, 0.5, 0.6)
            .cube(TextureId::Iron),
    )?;
    graph.add_child(
        tv,
        SceneNode::new("tv stem")
            .translate(0.5, 15.0, 0.0)
            .scale(0.15, 15.0, 0.1)
            .cube(TextureId::Iron),
    )?;
    graph.add_child(
        tv,
        SceneNode::new("tv back")
            .translate(0.15, 25.0, 0.0)
            .scale(0.2, 20.0, 1.5)
            .cube(TextureId::Iron),
    )?;
    graph.add_child(
        tv,
        SceneNode::new("tv screen")
            .translate(0.1, 25.0, 0.0)
            .scale(0.2, 18.0, 1.4)
            .cube(TextureId::Gloss)
            .surface(Surface::TvScreen {
                on: TextureId::Soundwave,
                off: TextureId::Gloss,
            }),
    )?;
    Ok(())
}

fn add_speaker(
    graph: &mut SceneGraph,
    carpet: NodeId,
    name: &str,
    z: f32,
) -> Result<(), SceneError> {
    let body = graph.add_child(
        carpet,
        SceneNode::new(name)
            .translate(0.8, 15.0, z)
            .scale(0.1, 15.0, 0.1)
            .cube(TextureId::Plastic)
            .driven_by(NodeDriver::SpeakerPulse),
    )?;
    graph.add_child(
        body,
        SceneNode::new(format!("{name} grille"))
            .translate(-1.0, 0.0, 0.0)
            .scale(0.1, 0.9, 0.8)
            .cube(TextureId::Mesh),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{DrawCall, FrameContext, GeometryKind, MatrixStack, SceneState};
    use cgmath::{Matrix4, SquareMatrix};

    fn render(state: &SceneState, mesh_ready: bool) -> (SceneGraph, Vec<DrawCall>) {
        let graph = build(&OrnamentPlacement::default()).unwrap();
        let frame = FrameContext {
            view_proj: Matrix4::identity(),
            state,
            mesh_ready,
        };
        let mut stack = MatrixStack::new();
        let mut calls = Vec::new();
        graph.render(&frame, &mut stack, &mut calls).unwrap();
        assert_eq!(stack.depth(), 0);
        (graph, calls)
    }

    fn names(graph: &SceneGraph, calls: &[DrawCall]) -> Vec<String> {
        calls
            .iter()
            .map(|c| graph.node(c.node).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn room_draws_in_furniture_order() {
        let (graph, calls) = render(&SceneState::default(), true);
        let order = names(&graph, &calls);
        assert_eq!(calls.len(), 49);
        assert_eq!(order[0], "carpet");
        assert_eq!(
            &order[1..13],
            &[
                "table top",
                "table leg 1",
                "table leg 2",
                "table leg 3",
                "table leg 4",
                "coaster 1",
                "coaster 2",
                "remote",
                "remote button 1",
                "remote button 2",
                "power button",
                "ornament",
            ]
        );
        assert_eq!(
            &order[13..21],
            &[
                "long sofa back",
                "long sofa front",
                "long sofa arm 1",
                "long sofa arm 2",
                "short sofa back",
                "short sofa front",
                "short sofa arm 1",
                "short sofa arm 2",
            ]
        );
        assert_eq!(order[21], "lamp 1 base");
        assert_eq!(order[27], "lamp 2 base");
        assert_eq!(order[33], "rug");
        assert_eq!(order[34], "bean bag");
        assert_eq!(
            &order[35..45],
            &[
                "cabinet top",
                "cabinet shelf",
                "cabinet leg 1",
                "cabinet leg 2",
                "cabinet leg 3",
                "cabinet leg 4",
                "tv base",
                "tv stem",
                "tv back",
                "tv screen",
            ]
        );
        assert_eq!(
            &order[45..],
            &["speaker 1", "speaker 1 grille", "speaker 2", "speaker 2 grille"]
        );
    }

    #[test]
    fn ornament_waits_for_mesh() {
        let (graph, calls) = render(&SceneState::default(), false);
        assert_eq!(calls.len(), 48);
        assert!(graph.find("ornament").is_some());
        assert!(calls.iter().all(|c| c.geometry != GeometryKind::Mesh));
    }

    #[test]
    fn round_pieces_use_the_cylinder() {
        let (graph, calls) = render(&SceneState::default(), true);
        let cylinders: Vec<String> = calls
            .iter()
            .filter(|c| c.geometry == GeometryKind::Cylinder)
            .map(|c| graph.node(c.node).unwrap().name.clone())
            .collect();
        assert_eq!(
            cylinders,
            [
                "coaster 1",
                "coaster 2",
                "power button",
                "lamp 1 base",
                "lamp 1 pole",
                "lamp 2 base",
                "lamp 2 pole",
                "bean bag",
            ]
        );
    }

    #[test]
    fn tv_screen_is_the_only_unlit_draw_when_on() {
        let mut state = SceneState::default();
        let (_, off) = render(&state, true);
        assert!(off.iter().all(|c| !c.uniform.is_unlit()));

        state.tv_on = true;
        let (graph, on) = render(&state, true);
        let unlit: Vec<_> = on.iter().filter(|c| c.uniform.is_unlit()).collect();
        assert_eq!(unlit.len(), 1);
        assert_eq!(graph.node(unlit[0].node).unwrap().name, "tv screen");
        assert_eq!(unlit[0].texture, Some(TextureId::Soundwave));
    }

    #[test]
    fn spinning_the_carpet_moves_everything() {
        let still = SceneState::default();
        let mut spun = SceneState::default();
        spun.rotation_angle = 45.0;
        let (_, a) = render(&still, true);
        let (_, b) = render(&spun, true);
        assert!(a.iter().zip(&b).all(|(x, y)| x.uniform.model != y.uniform.model));
    }
}
