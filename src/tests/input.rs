use crate::error::InputError;
use crate::input::{BoundedInput, ByteInput, WindowInput};
use crate::window::ByteWindow;

#[test]
fn test_budget_allows_exact_limit() {
    let data = [1u8, 2, 3, 4];
    let mut input = BoundedInput::new(&data[..], 4);
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf).unwrap();
    assert_eq!(buf, data);
    assert_eq!(input.budget().consumed(), 4);
    assert_eq!(input.budget().remaining(), 0);
}

#[test]
fn test_budget_overflow_is_sticky_and_reads_nothing() {
    let data = [7u8; 8];
    let mut input = BoundedInput::new(&data[..], 3);
    assert_eq!(input.read_u8(), Ok(7));
    let mut buf = [0u8; 3];
    assert_eq!(
        input.read_exact(&mut buf),
        Err(InputError::TooLarge { limit: 3 })
    );
    assert_eq!(buf, [0u8; 3]);
    assert_eq!(input.budget().consumed(), 1);
    // a read that would fit is still refused
    assert_eq!(input.read_u8(), Err(InputError::TooLarge { limit: 3 }));
    assert_eq!(input.into_inner().len(), 7);
}

#[test]
fn test_budget_checked_before_availability() {
    let data = [0u8; 2];
    let mut input = BoundedInput::new(&data[..], 4);
    assert_eq!(input.read_vec(5), Err(InputError::TooLarge { limit: 4 }));

    let mut input = BoundedInput::new(&data[..], 4);
    assert_eq!(
        input.read_vec(3),
        Err(InputError::Incomplete {
            needed: 3,
            available: 2
        })
    );
    assert_eq!(input.budget().consumed(), 0);
}

#[test]
fn test_window_input_short_read_keeps_cursor() {
    let mut window = ByteWindow::from(&[1u8, 2, 3][..]);
    {
        let mut input = WindowInput::new(&mut window);
        assert_eq!(input.read_u8(), Ok(1));
        let mut buf = [0u8; 4];
        assert_eq!(
            input.read_exact(&mut buf),
            Err(InputError::Incomplete {
                needed: 4,
                available: 2
            })
        );
    }
    assert_eq!(window.reader_index(), 1);
    assert_eq!(window.unread(), &[2, 3]);
}

#[test]
fn test_require_consumes_nothing() {
    let data = [1u8, 2, 3];
    let mut input = BoundedInput::new(&data[..], 8);
    assert_eq!(input.require(3), Ok(()));
    assert_eq!(
        input.require(4),
        Err(InputError::Incomplete {
            needed: 4,
            available: 3
        })
    );
    assert_eq!(input.budget().consumed(), 0);
    assert_eq!(input.read_u8(), Ok(1));

    assert_eq!(input.require(9), Err(InputError::TooLarge { limit: 8 }));
    assert!(input.budget().is_exhausted());
}
